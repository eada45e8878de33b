//! Error taxonomy of the listing/transfer pipeline.
//!
//! Every failure is fatal for the current run: components return one of
//! these variants and `main` reports it and exits with status 1.

use std::path::PathBuf;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Cannot authenticate with or reach the remote service, or a listing
    /// call failed.
    #[error("connectivity error ({context}): {source}")]
    Connectivity {
        context: String,
        #[source]
        source: dbx_api::ApiError,
    },

    /// Work queue I/O failed.
    #[error("queue '{queue}' storage error: {message}")]
    Storage { queue: String, message: String },

    /// A queued blob is not a well-formed work item.
    #[error("queue '{queue}' holds an invalid work item: {source}")]
    InvalidWorkItem {
        queue: String,
        #[source]
        source: serde_json::Error,
    },

    /// Local directory could not be created.
    #[error("cannot create directory {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Download of a remote file failed.
    #[error("failed to download {remote} to {}: {source}", .local.display())]
    Transfer {
        remote: String,
        local: PathBuf,
        #[source]
        source: dbx_api::ApiError,
    },

    /// Timestamp could not be parsed or applied to the local file.
    #[error("cannot set timestamps on {}: {message}", .path.display())]
    Metadata { path: PathBuf, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn storage(queue: &str, err: impl std::fmt::Display) -> Self {
        PipelineError::Storage {
            queue: queue.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn connectivity(context: impl Into<String>, source: dbx_api::ApiError) -> Self {
        PipelineError::Connectivity {
            context: context.into(),
            source,
        }
    }
}
