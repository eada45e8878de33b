//! Dropbox wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a folder listing, discriminated by the `.tag` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
pub enum Metadata {
    File(FileMetadata),
    Folder(FolderMetadata),
    Deleted(DeletedMetadata),
}

impl Metadata {
    pub fn name(&self) -> &str {
        match self {
            Metadata::File(f) => &f.name,
            Metadata::Folder(f) => &f.name,
            Metadata::Deleted(d) => &d.name,
        }
    }

    /// Display path of the entry, falling back to the bare name when the
    /// API omits it (entries outside the caller's namespace).
    pub fn path_display(&self) -> &str {
        let path = match self {
            Metadata::File(f) => f.path_display.as_deref(),
            Metadata::Folder(f) => f.path_display.as_deref(),
            Metadata::Deleted(d) => d.path_display.as_deref(),
        };
        path.unwrap_or_else(|| self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub path_display: Option<String>,
    #[serde(default)]
    pub path_lower: Option<String>,
    pub client_modified: DateTime<Utc>,
    pub server_modified: DateTime<Utc>,
    #[serde(default)]
    pub rev: String,
    pub size: u64,
    #[serde(default)]
    pub content_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderMetadata {
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub path_display: Option<String>,
    #[serde(default)]
    pub path_lower: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedMetadata {
    pub name: String,
    #[serde(default)]
    pub path_display: Option<String>,
    #[serde(default)]
    pub path_lower: Option<String>,
}

/// A page of `files/list_folder` or `files/list_folder/continue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFolderResult {
    pub entries: Vec<Metadata>,
    pub cursor: String,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountName {
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub familiar_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub abbreviated_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountType {
    #[serde(rename = ".tag", default)]
    pub tag: String,
}

/// Response of `users/get_current_account`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAccount {
    pub account_id: String,
    #[serde(default)]
    pub name: AccountName,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub referral_link: String,
    #[serde(default)]
    pub is_paired: bool,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub account_type: AccountType,
}

impl FullAccount {
    /// Flattened `(attribute, value)` pairs in a stable order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        vec![
            ("account_id".to_string(), self.account_id.clone()),
            ("account_type".to_string(), self.account_type.tag.clone()),
            (
                "country".to_string(),
                self.country.clone().unwrap_or_else(|| "-".to_string()),
            ),
            ("disabled".to_string(), self.disabled.to_string()),
            ("email".to_string(), self.email.clone()),
            ("email_verified".to_string(), self.email_verified.to_string()),
            ("is_paired".to_string(), self.is_paired.to_string()),
            ("locale".to_string(), self.locale.clone()),
            ("name".to_string(), self.name.display_name.clone()),
            ("referral_link".to_string(), self.referral_link.clone()),
        ]
    }
}
