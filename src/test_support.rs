//! In-memory remote tree shared by the pipeline tests.

use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::remote::{AccountInfo, ListingPage, RemoteEntry, RemoteTree};

pub(crate) fn server_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 8, 16, 11, 30, 0).unwrap()
}

pub(crate) fn client_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 3, 1, 8, 15, 0).unwrap()
}

/// A file entry with the fixed test timestamps.
pub(crate) fn file_at(path: &str, size: u64) -> RemoteEntry {
    RemoteEntry::file(path, size, server_time(), client_time())
}

fn not_found(what: &str) -> dbx_api::ApiError {
    dbx_api::ApiError::Status {
        endpoint: "fake".to_string(),
        status: 409,
        body: format!("{}/not_found/", what),
    }
}

/// Listings are keyed by path; page `n` of a listing of `p` is reached with
/// cursor `p#n`. File contents are generated from the path unless set.
#[derive(Default)]
pub(crate) struct FakeRemote {
    first_pages: HashMap<String, ListingPage>,
    by_cursor: HashMap<String, ListingPage>,
    contents: HashMap<String, Vec<u8>>,
    failing_cursors: HashSet<String>,
    failing_downloads: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeRemote {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_listing(mut self, path: &str, pages: Vec<Vec<RemoteEntry>>) -> Self {
        let count = pages.len();
        for (index, entries) in pages.into_iter().enumerate() {
            let page = ListingPage {
                entries,
                has_more: index + 1 < count,
                cursor: format!("{}#{}", path, index + 1),
            };
            if index == 0 {
                self.first_pages.insert(path.to_string(), page);
            } else {
                self.by_cursor.insert(format!("{}#{}", path, index), page);
            }
        }
        self
    }

    pub(crate) fn with_content(mut self, path: &str, content: &[u8]) -> Self {
        self.contents.insert(path.to_string(), content.to_vec());
        self
    }

    pub(crate) fn failing_cursor(mut self, cursor: &str) -> Self {
        self.failing_cursors.insert(cursor.to_string());
        self
    }

    pub(crate) fn failing_download(mut self, path: &str) -> Self {
        self.failing_downloads.insert(path.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn downloads(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.strip_prefix("download ").map(str::to_string))
            .collect()
    }

    pub(crate) fn content_of(&self, path: &str) -> Vec<u8> {
        self.contents
            .get(path)
            .cloned()
            .unwrap_or_else(|| format!("contents of {}", path).into_bytes())
    }

    fn all_entries(&self) -> impl Iterator<Item = &RemoteEntry> {
        self.first_pages
            .values()
            .chain(self.by_cursor.values())
            .flat_map(|page| page.entries.iter())
    }
}

impl RemoteTree for FakeRemote {
    async fn list_page(&self, path: &str, _recursive: bool) -> PipelineResult<ListingPage> {
        self.calls.borrow_mut().push(format!("list {}", path));
        self.first_pages
            .get(path)
            .cloned()
            .ok_or_else(|| PipelineError::connectivity(format!("listing '{}'", path), not_found("path")))
    }

    async fn continue_page(&self, cursor: &str) -> PipelineResult<ListingPage> {
        self.calls.borrow_mut().push(format!("continue {}", cursor));
        if self.failing_cursors.contains(cursor) {
            return Err(PipelineError::connectivity(
                "continuing listing",
                not_found("cursor"),
            ));
        }
        self.by_cursor
            .get(cursor)
            .cloned()
            .ok_or_else(|| PipelineError::connectivity("continuing listing", not_found("cursor")))
    }

    async fn download_to_file(&self, remote_path: &str, local_path: &Path) -> PipelineResult<u64> {
        self.calls
            .borrow_mut()
            .push(format!("download {}", remote_path));
        let transfer_err = |source| PipelineError::Transfer {
            remote: remote_path.to_string(),
            local: local_path.to_path_buf(),
            source,
        };

        if self.failing_downloads.contains(remote_path) {
            return Err(transfer_err(not_found("path")));
        }
        let content = self.content_of(remote_path);
        std::fs::write(local_path, &content).map_err(|source| {
            transfer_err(dbx_api::ApiError::Io {
                path: local_path.display().to_string(),
                source,
            })
        })?;
        Ok(content.len() as u64)
    }

    async fn metadata(&self, path: &str) -> PipelineResult<RemoteEntry> {
        self.calls.borrow_mut().push(format!("metadata {}", path));
        self.all_entries()
            .find(|entry| entry.path_display == path)
            .cloned()
            .ok_or_else(|| PipelineError::connectivity(format!("metadata of '{}'", path), not_found("path")))
    }

    async fn account_info(&self) -> PipelineResult<AccountInfo> {
        Ok(AccountInfo {
            email: "tester@example.com".to_string(),
            attributes: vec![
                ("email".to_string(), "tester@example.com".to_string()),
                ("name".to_string(), "Test User".to_string()),
            ],
        })
    }
}
