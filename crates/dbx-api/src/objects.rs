//! Object operations (metadata, download)

use futures_util::StreamExt;
use serde::Serialize;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::client::{header_safe_json, send, DropboxClient};
use crate::error::{ApiError, ApiResult};
use crate::types::Metadata;

/// Write buffer size for downloads (2 MB) - reduces I/O operations
const WRITE_BUFFER_SIZE: usize = 2 * 1024 * 1024;

#[derive(Serialize)]
struct PathArg<'a> {
    path: &'a str,
}

impl DropboxClient {
    pub async fn get_metadata(&self, path: &str) -> ApiResult<Metadata> {
        self.rpc("files/get_metadata", Some(&PathArg { path })).await
    }

    /// Stream the file at `path` into `destination`, returning the number of
    /// bytes written. The parent directory must already exist. A partially
    /// written file is removed when the transfer fails.
    pub async fn download_to_file(&self, path: &str, destination: &Path) -> ApiResult<u64> {
        if path.is_empty() {
            return Err(ApiError::InvalidArgument(
                "download path must not be empty".to_string(),
            ));
        }

        let route = "files/download";
        let url = self.content_endpoint(route);
        let request = self
            .authorized_post(&url)
            .header("Dropbox-API-Arg", header_safe_json(&PathArg { path })?);
        let response = send(request, route).await?;

        let result = write_body(response, route, destination).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(destination).await;
        }
        result
    }
}

async fn write_body(
    response: reqwest::Response,
    route: &str,
    destination: &Path,
) -> ApiResult<u64> {
    let io_err = |source| ApiError::Io {
        path: destination.display().to_string(),
        source,
    };

    let mut file = File::create(destination).await.map_err(io_err)?;
    let mut stream = response.bytes_stream();
    let mut write_buffer = Vec::with_capacity(WRITE_BUFFER_SIZE);
    let mut written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|source| ApiError::Http {
            endpoint: route.to_string(),
            source,
        })?;
        write_buffer.extend_from_slice(&chunk);
        written += chunk.len() as u64;

        if write_buffer.len() >= WRITE_BUFFER_SIZE {
            file.write_all(&write_buffer).await.map_err(io_err)?;
            write_buffer.clear();
        }
    }

    if !write_buffer.is_empty() {
        file.write_all(&write_buffer).await.map_err(io_err)?;
    }
    file.flush().await.map_err(io_err)?;

    log::debug!("downloaded {} bytes to {}", written, destination.display());
    Ok(written)
}
