//! Transfer executor - one work item to one local file with preserved times

use std::fs::{FileTimes, OpenOptions};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use super::types::TransferOutcome;
use crate::error::{PipelineError, PipelineResult};
use crate::listing::ExcludeFilter;
use crate::queue::{Timestamp, WorkItem};
use crate::remote::RemoteTree;

/// Local destination of `remote_path` under `dest_root`. Only normal path
/// components are kept, so a remote path can never climb out of the root.
pub fn local_path_for(dest_root: &Path, remote_path: &str) -> PathBuf {
    let mut local = dest_root.to_path_buf();
    for component in Path::new(remote_path).components() {
        if let Component::Normal(part) = component {
            local.push(part);
        }
    }
    local
}

/// Download one item below `dest_root` and stamp it with the remote times:
/// access time from `server_modified`, modification time from
/// `client_modified`. Empty entries and excluded paths are no-ops.
pub async fn transfer<R: RemoteTree>(
    remote: &R,
    item: &WorkItem,
    dest_root: &Path,
    exclude: &ExcludeFilter,
) -> PipelineResult<TransferOutcome> {
    if !item.is_transferable() {
        log::info!("empty file or directory, skipping {}", item.path_display);
        return Ok(TransferOutcome::SkippedEmpty);
    }

    if exclude.is_excluded(&item.path_display) {
        log::info!("Excluding {}", item.path_display);
        return Ok(TransferOutcome::Excluded);
    }

    let local_path = local_path_for(dest_root, &item.path_display);
    if let Some(local_dir) = local_path.parent() {
        ensure_dir(local_dir).await?;
    }

    log::info!("Downloading {} to {}", item.path_display, local_path.display());
    let bytes = remote
        .download_to_file(&item.path_display, &local_path)
        .await?;

    apply_times(&local_path, item)?;
    Ok(TransferOutcome::Downloaded { local_path, bytes })
}

async fn ensure_dir(dir: &Path) -> PipelineResult<()> {
    let fs_err = |source| PipelineError::Filesystem {
        path: dir.to_path_buf(),
        source,
    };

    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(fs_err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "path exists and is not a directory",
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(fs_err(e)),
    }

    log::info!("Creating directory {}", dir.display());
    tokio::fs::create_dir_all(dir).await.map_err(fs_err)
}

fn resolve(path: &Path, field: &str, value: Option<&Timestamp>) -> PipelineResult<SystemTime> {
    let metadata_err = |message: String| PipelineError::Metadata {
        path: path.to_path_buf(),
        message,
    };
    let timestamp = value.ok_or_else(|| metadata_err(format!("{} is missing", field)))?;
    let resolved = timestamp
        .resolve()
        .map_err(|e| metadata_err(format!("{} '{}': {}", field, timestamp, e)))?;
    Ok(SystemTime::from(resolved))
}

fn apply_times(path: &Path, item: &WorkItem) -> PipelineResult<()> {
    let accessed = resolve(path, "server_modified", item.server_modified.as_ref())?;
    let modified = resolve(path, "client_modified", item.client_modified.as_ref())?;

    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|e| PipelineError::Metadata {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    file.set_times(
        FileTimes::new()
            .set_accessed(accessed)
            .set_modified(modified),
    )
    .map_err(|e| PipelineError::Metadata {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
