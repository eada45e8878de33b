//! dbxcli: list a Dropbox tree and download it, either directly or through a
//! durable work queue that decouples discovery from transfer.
//!
//! Data flows `listing` → `queue` → `download`; `inspect` is a separate
//! read path over the same queue. Everything remote goes through the
//! [`remote::RemoteTree`] trait.

pub mod account;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod inspect;
pub mod listing;
pub mod queue;
pub mod remote;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{PipelineError, PipelineResult};

/// Version of this crate.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
