//! Seed a queue from a JSON list of remote paths.

use std::path::Path;

use super::store::WorkQueue;
use crate::error::{PipelineError, PipelineResult};
use crate::remote::RemoteTree;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub pushed: usize,
    pub skipped: usize,
}

/// Read a JSON array of remote paths, e.g. the output of a diff between two
/// listings.
pub fn read_path_list(file: &Path) -> PipelineResult<Vec<String>> {
    let text = std::fs::read_to_string(file).map_err(|e| {
        PipelineError::Config(format!("cannot read path list {}: {}", file.display(), e))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        PipelineError::Config(format!(
            "{} is not a JSON array of paths: {}",
            file.display(),
            e
        ))
    })
}

/// Look up each path remotely and push a work item for every transferable
/// file. Everything is committed in a single batch at the end.
pub async fn import_paths<R: RemoteTree>(
    remote: &R,
    queue_root: &Path,
    queue_name: &str,
    paths: &[String],
) -> PipelineResult<ImportSummary> {
    let mut queue = WorkQueue::open(queue_root, queue_name).await?;
    let mut summary = ImportSummary::default();

    for path in paths {
        let entry = remote.metadata(path).await?;
        if !entry.is_transferable() {
            log::info!("empty file or directory, not queued: {}", entry.path_display);
            summary.skipped += 1;
            continue;
        }

        let blob = entry
            .to_work_item()
            .to_blob()
            .map_err(|source| PipelineError::InvalidWorkItem {
                queue: queue_name.to_string(),
                source,
            })?;
        queue.push(blob);
        summary.pushed += 1;
    }

    queue.close().await?;
    log::info!(
        "queue '{}': imported {} item(s), skipped {}",
        queue_name,
        summary.pushed,
        summary.skipped
    );
    Ok(summary)
}
