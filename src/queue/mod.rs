//! Work queue module
//!
//! - `item`: Work item records and their timestamps
//! - `store`: Durable named FIFO queue backed by turso
//! - `import`: Seeding a queue from a list of remote paths

mod import;
mod item;
mod store;

pub use import::{import_paths, read_path_list, ImportSummary};
pub use item::{parse_timestamp, Timestamp, WorkItem, WIRE_TIME_FORMAT};
pub use store::{queue_dir, WorkQueue, QUEUE_DB_FILE};
