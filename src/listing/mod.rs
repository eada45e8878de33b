//! Enumerator: paginated walk of a remote folder that prints every entry
//! and optionally feeds transferable files into a work queue.

mod format;

use std::io::Write;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::queue::WorkQueue;
use crate::remote::{normalize_root, RemoteEntry, RemoteTree};

pub use format::{human_size, listing_line};

/// Remote path prefixes to leave out of listings and transfers.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    prefixes: Vec<String>,
}

impl ExcludeFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// The first configured prefix `path` starts with, if any.
    pub fn matching_prefix(&self, path: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|prefix| path.starts_with(prefix.as_str()))
            .map(String::as_str)
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.matching_prefix(path).is_some()
    }
}

/// Where accepted entries go besides the printed listing.
#[derive(Debug, Clone, Copy)]
pub enum Sink<'a> {
    Print,
    Enqueue { queue_root: &'a Path, queue: &'a str },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingSummary {
    pub pages: usize,
    pub listed: usize,
    pub excluded: usize,
    pub enqueued: usize,
}

/// Walk `root_path` page by page. Every entry is either reported as
/// excluded or printed; with an enqueue sink, transferable entries are
/// pushed as work items and the queue is committed after each page.
///
/// Any remote error aborts the walk. Pages committed before the failure
/// stay in the queue.
pub async fn enumerate<R, W>(
    remote: &R,
    root_path: &str,
    recursive: bool,
    exclude: &ExcludeFilter,
    sink: Sink<'_>,
    out: &mut W,
) -> PipelineResult<ListingSummary>
where
    R: RemoteTree,
    W: Write,
{
    let root_path = normalize_root(root_path);
    let mut summary = ListingSummary::default();
    let mut page = remote.list_page(root_path, recursive).await?;

    loop {
        summary.pages += 1;
        let mut queue = match sink {
            Sink::Print => None,
            Sink::Enqueue { queue_root, queue } => Some(WorkQueue::open(queue_root, queue).await?),
        };

        for entry in &page.entries {
            if let Some(prefix) = exclude.matching_prefix(&entry.path_display) {
                log::debug!("{} matches exclusion prefix {}", entry.path_display, prefix);
                writeln!(out, "Excluding {}", entry.path_display)?;
                summary.excluded += 1;
                continue;
            }

            writeln!(out, "{}", listing_line(entry))?;
            summary.listed += 1;

            if let Some(queue) = queue.as_mut() {
                if push_entry(queue, entry)? {
                    summary.enqueued += 1;
                }
            }
        }

        // Batch boundary: a crash loses at most the page in progress.
        if let Some(queue) = queue {
            queue.close().await?;
        }

        if !page.has_more {
            break;
        }
        page = remote.continue_page(&page.cursor).await?;
    }

    log::info!(
        "listed {} entries over {} page(s), {} excluded, {} enqueued",
        summary.listed,
        summary.pages,
        summary.excluded,
        summary.enqueued
    );
    Ok(summary)
}

fn push_entry(queue: &mut WorkQueue, entry: &RemoteEntry) -> PipelineResult<bool> {
    if !entry.is_transferable() {
        return Ok(false);
    }
    let blob = entry
        .to_work_item()
        .to_blob()
        .map_err(|source| PipelineError::InvalidWorkItem {
            queue: queue.name().to_string(),
            source,
        })?;
    queue.push(blob);
    Ok(true)
}
