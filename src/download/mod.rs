//! Download module: turning work items into local files
//!
//! - `worker`: The transfer executor (directories, download, timestamps)
//! - `commands`: Queue-driven drain and direct walk-and-transfer
//! - `types`: Per-item outcomes and run totals

mod commands;
mod types;
mod worker;

pub use commands::{drain, walk_and_transfer};
pub use types::{TransferOutcome, TransferSummary};
pub use worker::{local_path_for, transfer};
