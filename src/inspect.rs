//! Queue inspector: print the remote paths waiting in a queue.

use std::io::Write;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::queue::{WorkItem, WorkQueue};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeekMode {
    /// Pop every item while printing it. The queue is empty afterwards.
    #[default]
    Drain,
    /// Read the items in place; nothing is removed.
    Keep,
}

/// Print the `path_display` of every queued item in FIFO order and return
/// how many were printed.
///
/// In [`PeekMode::Drain`] pops are committed as they happen, so the queue
/// ends up empty whether or not `flush` is set; `flush` only adds an
/// explicit close of the handle.
pub async fn peek<W: Write>(
    queue_root: &Path,
    queue_name: &str,
    mode: PeekMode,
    flush: bool,
    out: &mut W,
) -> PipelineResult<usize> {
    let mut queue = WorkQueue::open(queue_root, queue_name).await?;
    let mut printed = 0;

    match mode {
        PeekMode::Keep => {
            for blob in queue.snapshot().await? {
                writeln!(out, "{}", decode(queue_name, &blob)?.path_display)?;
                printed += 1;
            }
        }
        PeekMode::Drain => {
            while let Some(blob) = queue.pop().await? {
                writeln!(out, "{}", decode(queue_name, &blob)?.path_display)?;
                printed += 1;
            }
        }
    }

    if flush {
        queue.close().await?;
    }
    log::debug!("queue '{}': peeked {} item(s)", queue_name, printed);
    Ok(printed)
}

fn decode(queue_name: &str, blob: &[u8]) -> PipelineResult<WorkItem> {
    WorkItem::from_blob(blob).map_err(|source| PipelineError::InvalidWorkItem {
        queue: queue_name.to_string(),
        source,
    })
}
