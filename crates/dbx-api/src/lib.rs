//! dbx-api - Dropbox v2 API client
//!
//! This crate is organized into submodules:
//! - `types`: Wire structures returned by the API
//! - `client`: Client configuration and the shared RPC plumbing
//! - `list`: Folder listing (first page and cursor continuation)
//! - `objects`: Metadata lookup and streamed downloads
//! - `account`: Current account information
//!
//! The client is deliberately thin: it performs exactly one HTTP request per
//! call, never retries, and leaves path conventions (the root is `""`, not
//! `"/"`) to the caller.

mod account;
mod client;
mod error;
mod list;
mod objects;
mod types;

pub use client::{DropboxClient, DropboxConfig, DEFAULT_API_URL, DEFAULT_CONTENT_URL};
pub use error::{ApiError, ApiResult};
pub use types::{
    AccountName, AccountType, DeletedMetadata, FileMetadata, FolderMetadata, FullAccount,
    ListFolderResult, Metadata,
};

/// Version of this client, reported by `dbxcli version`.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
