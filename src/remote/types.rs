use chrono::{DateTime, Utc};

use crate::queue::{Timestamp, WorkItem};

/// A live listing entry. Directories (and deleted entries) carry no size.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEntry {
    pub path_display: String,
    pub size: Option<u64>,
    pub server_modified: Option<DateTime<Utc>>,
    pub client_modified: Option<DateTime<Utc>>,
}

impl RemoteEntry {
    pub fn file(
        path: impl Into<String>,
        size: u64,
        server_modified: DateTime<Utc>,
        client_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            path_display: path.into(),
            size: Some(size),
            server_modified: Some(server_modified),
            client_modified: Some(client_modified),
        }
    }

    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            path_display: path.into(),
            size: None,
            server_modified: None,
            client_modified: None,
        }
    }

    /// Only entries with a positive size are queued or downloaded.
    pub fn is_transferable(&self) -> bool {
        self.size.unwrap_or(0) > 0
    }

    pub fn to_work_item(&self) -> WorkItem {
        WorkItem {
            path_display: self.path_display.clone(),
            size: self.size.unwrap_or(0),
            server_modified: self.server_modified.map(Timestamp::Structured),
            client_modified: self.client_modified.map(Timestamp::Structured),
        }
    }
}

/// One page of a listing session. The cursor belongs to the session and is
/// never copied into work items.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub entries: Vec<RemoteEntry>,
    pub has_more: bool,
    pub cursor: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccountInfo {
    pub email: String,
    pub attributes: Vec<(String, String)>,
}
