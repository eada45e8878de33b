//! `RemoteTree` over the Dropbox HTTP API

use dbx_api::{ApiError, DropboxClient, ListFolderResult, Metadata};
use std::path::Path;

use super::types::{AccountInfo, ListingPage, RemoteEntry};
use super::RemoteTree;
use crate::error::{PipelineError, PipelineResult};

impl From<Metadata> for RemoteEntry {
    fn from(metadata: Metadata) -> Self {
        match metadata {
            Metadata::File(f) => RemoteEntry {
                path_display: f.path_display.unwrap_or(f.name),
                size: Some(f.size),
                server_modified: Some(f.server_modified),
                client_modified: Some(f.client_modified),
            },
            other => RemoteEntry::folder(other.path_display()),
        }
    }
}

impl From<ListFolderResult> for ListingPage {
    fn from(result: ListFolderResult) -> Self {
        ListingPage {
            entries: result.entries.into_iter().map(RemoteEntry::from).collect(),
            has_more: result.has_more,
            cursor: result.cursor,
        }
    }
}

impl RemoteTree for DropboxClient {
    async fn list_page(&self, path: &str, recursive: bool) -> PipelineResult<ListingPage> {
        self.list_folder(path, recursive)
            .await
            .map(ListingPage::from)
            .map_err(|e| PipelineError::connectivity(format!("listing '{}'", path), e))
    }

    async fn continue_page(&self, cursor: &str) -> PipelineResult<ListingPage> {
        self.list_folder_continue(cursor)
            .await
            .map(ListingPage::from)
            .map_err(|e| PipelineError::connectivity("continuing listing", e))
    }

    async fn download_to_file(&self, remote_path: &str, local_path: &Path) -> PipelineResult<u64> {
        DropboxClient::download_to_file(self, remote_path, local_path)
            .await
            .map_err(|source| PipelineError::Transfer {
                remote: remote_path.to_string(),
                local: local_path.to_path_buf(),
                source,
            })
    }

    async fn metadata(&self, path: &str) -> PipelineResult<RemoteEntry> {
        self.get_metadata(path)
            .await
            .map(RemoteEntry::from)
            .map_err(|e| PipelineError::connectivity(format!("metadata of '{}'", path), e))
    }

    async fn account_info(&self) -> PipelineResult<AccountInfo> {
        let account = self
            .get_current_account()
            .await
            .map_err(|e| PipelineError::connectivity(account_context(&e), e))?;
        Ok(AccountInfo {
            attributes: account.attributes(),
            email: account.email,
        })
    }
}

/// 401 on the account call means the token itself was refused.
fn account_context(err: &ApiError) -> String {
    match err.status() {
        Some(401) => "fetching current account: access token rejected, \
                      generate a new one at https://dropbox.com/developers/apps"
            .to_string(),
        _ => "fetching current account".to_string(),
    }
}
