//! Remote tree seam
//!
//! The pipeline talks to the remote store only through [`RemoteTree`]:
//! - `types`: Live entries and listing pages
//! - `dropbox`: Implementation backed by `dbx_api::DropboxClient`

mod dropbox;
mod types;

use std::path::Path;

use crate::error::PipelineResult;

pub use types::{AccountInfo, ListingPage, RemoteEntry};

/// Operations the pipeline consumes from the remote store. Every call
/// completes before the next one is issued; implementations do not retry.
#[allow(async_fn_in_trait)]
pub trait RemoteTree {
    /// First page of a listing of `path` (`""` is the root).
    async fn list_page(&self, path: &str, recursive: bool) -> PipelineResult<ListingPage>;

    /// Next page of a listing, addressed by the previous page's cursor.
    async fn continue_page(&self, cursor: &str) -> PipelineResult<ListingPage>;

    /// Stream one remote file to `local_path`. Returns bytes written.
    async fn download_to_file(&self, remote_path: &str, local_path: &Path) -> PipelineResult<u64>;

    /// Current metadata of a single remote path.
    async fn metadata(&self, path: &str) -> PipelineResult<RemoteEntry>;

    /// Account the session is authenticated as.
    async fn account_info(&self) -> PipelineResult<AccountInfo>;
}

/// The remote API addresses its root as `""`; users type `/`.
pub fn normalize_root(path: &str) -> &str {
    if path == "/" {
        ""
    } else {
        path
    }
}
