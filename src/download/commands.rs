//! Transfer consumer: queue-driven drain and direct walk-and-transfer

use std::path::Path;

use super::types::TransferSummary;
use super::worker::transfer;
use crate::error::{PipelineError, PipelineResult};
use crate::listing::ExcludeFilter;
use crate::queue::{WorkItem, WorkQueue};
use crate::remote::{normalize_root, RemoteTree};

/// Transfer every item of `queue_name`, one at a time, until it is empty.
///
/// The queue is reopened for each item and closed after that item's
/// transfer, so a crash loses at most the item in flight. Any failure
/// aborts the drain; items not yet popped stay queued.
pub async fn drain<R: RemoteTree>(
    remote: &R,
    queue_root: &Path,
    queue_name: &str,
    dest_root: &Path,
    exclude: &ExcludeFilter,
) -> PipelineResult<TransferSummary> {
    let mut summary = TransferSummary::default();

    loop {
        let mut queue = WorkQueue::open(queue_root, queue_name).await?;
        let Some(blob) = queue.pop().await? else {
            break;
        };

        let item = WorkItem::from_blob(&blob).map_err(|source| PipelineError::InvalidWorkItem {
            queue: queue_name.to_string(),
            source,
        })?;
        let outcome = transfer(remote, &item, dest_root, exclude).await?;
        summary.record(&outcome);
        queue.close().await?;
    }

    log::info!(
        "queue '{}' drained: {} downloaded ({} bytes), {} skipped, {} excluded",
        queue_name,
        summary.downloaded,
        summary.bytes,
        summary.skipped,
        summary.excluded
    );
    Ok(summary)
}

/// List `src_path` and transfer each entry as soon as it is seen, without
/// an intermediate queue.
pub async fn walk_and_transfer<R: RemoteTree>(
    remote: &R,
    src_path: &str,
    dest_root: &Path,
    recursive: bool,
    exclude: &ExcludeFilter,
) -> PipelineResult<TransferSummary> {
    let src_path = normalize_root(src_path);
    let mut summary = TransferSummary::default();
    let mut page = remote.list_page(src_path, recursive).await?;

    loop {
        for entry in &page.entries {
            let outcome = transfer(remote, &entry.to_work_item(), dest_root, exclude).await?;
            summary.record(&outcome);
        }

        if !page.has_more {
            break;
        }
        page = remote.continue_page(&page.cursor).await?;
    }

    log::info!(
        "transferred {} file(s) ({} bytes) from '{}', {} skipped, {} excluded",
        summary.downloaded,
        summary.bytes,
        src_path,
        summary.skipped,
        summary.excluded
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{enumerate, Sink};
    use crate::remote::RemoteEntry;
    use crate::test_support::{client_time, file_at, server_time, FakeRemote};
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn reports_tree() -> FakeRemote {
        FakeRemote::new().with_listing(
            "/reports",
            vec![
                vec![
                    RemoteEntry::folder("/reports"),
                    file_at("/reports/2017/q1.csv", 11),
                    RemoteEntry::folder("/reports/tmp"),
                    file_at("/reports/tmp/scratch.csv", 5),
                ],
                vec![
                    file_at("/reports/2017/q2.csv", 22),
                    file_at("/reports/empty.txt", 0),
                    file_at("/reports/summary.pdf", 33),
                ],
            ],
        )
    }

    async fn push_items(root: &Path, name: &str, items: &[WorkItem]) {
        let mut queue = WorkQueue::open(root, name).await.unwrap();
        for item in items {
            queue.push(item.to_blob().unwrap());
        }
        queue.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_to_queue_then_drain_downloads_everything_not_excluded() {
        let queues = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let remote = reports_tree();
        let exclude = ExcludeFilter::new(["/reports/tmp"]);
        let mut out = Vec::new();

        enumerate(
            &remote,
            "/reports",
            true,
            &exclude,
            Sink::Enqueue {
                queue_root: queues.path(),
                queue: "q1",
            },
            &mut out,
        )
        .await
        .unwrap();

        let summary = drain(&remote, queues.path(), "q1", dest.path(), &exclude)
            .await
            .unwrap();

        assert_eq!(summary.downloaded, 3);
        let expected = ["/reports/2017/q1.csv", "/reports/2017/q2.csv", "/reports/summary.pdf"];
        assert_eq!(summary.bytes, remote_bytes(&remote, &expected));
        assert_eq!(remote.downloads(), expected);
        for remote_path in expected {
            let local = dest.path().join(remote_path.trim_start_matches('/'));
            // Times first: reading the content moves atime on relatime mounts.
            let meta = std::fs::metadata(&local).unwrap();
            assert_eq!(meta.modified().unwrap(), SystemTime::from(client_time()));
            assert_eq!(meta.accessed().unwrap(), SystemTime::from(server_time()));
            assert_eq!(std::fs::read(&local).unwrap(), remote.content_of(remote_path));
        }
        assert!(!dest.path().join("reports/tmp").exists());

        let queue = WorkQueue::open(queues.path(), "q1").await.unwrap();
        assert!(queue.is_empty().await.unwrap());
    }

    fn remote_bytes(remote: &FakeRemote, paths: &[&str]) -> u64 {
        paths.iter().map(|p| remote.content_of(p).len() as u64).sum()
    }

    #[tokio::test]
    async fn draining_an_empty_queue_succeeds() {
        let queues = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let remote = FakeRemote::new();

        let summary = drain(
            &remote,
            queues.path(),
            "nothing",
            dest.path(),
            &ExcludeFilter::default(),
        )
        .await
        .unwrap();
        assert_eq!(summary, TransferSummary::default());
    }

    #[tokio::test]
    async fn failure_aborts_and_loses_only_the_item_in_flight() {
        let queues = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let remote = FakeRemote::new().failing_download("/b.bin");
        push_items(
            queues.path(),
            "q",
            &[
                file_at("/a.bin", 1).to_work_item(),
                file_at("/b.bin", 1).to_work_item(),
                file_at("/c.bin", 1).to_work_item(),
            ],
        )
        .await;

        let err = drain(&remote, queues.path(), "q", dest.path(), &ExcludeFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Transfer { .. }));
        assert_eq!(remote.downloads(), vec!["/a.bin", "/b.bin"]);

        let mut queue = WorkQueue::open(queues.path(), "q").await.unwrap();
        let next = WorkItem::from_blob(&queue.pop().await.unwrap().unwrap()).unwrap();
        assert_eq!(next.path_display, "/c.bin");
        assert!(queue.pop().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_blob_is_reported() {
        let queues = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let mut queue = WorkQueue::open(queues.path(), "bad").await.unwrap();
        queue.push(b"not json".to_vec());
        queue.close().await.unwrap();

        let err = drain(
            &FakeRemote::new(),
            queues.path(),
            "bad",
            dest.path(),
            &ExcludeFilter::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidWorkItem { .. }));
    }

    #[tokio::test]
    async fn direct_mode_transfers_without_a_queue() {
        let dest = TempDir::new().unwrap();
        let remote = reports_tree();

        let summary = walk_and_transfer(
            &remote,
            "/reports",
            dest.path(),
            true,
            &ExcludeFilter::new(["/reports/tmp"]),
        )
        .await
        .unwrap();

        assert_eq!(summary.downloaded, 3);
        assert_eq!(summary.excluded, 1);
        // Two folders and the empty file.
        assert_eq!(summary.skipped, 3);
        assert!(dest.path().join("reports/summary.pdf").exists());
        assert_eq!(
            remote.calls()[..2],
            ["list /reports".to_string(), "download /reports/2017/q1.csv".to_string()]
        );
    }

    #[tokio::test]
    async fn direct_mode_normalizes_slash_root() {
        let dest = TempDir::new().unwrap();
        let remote = FakeRemote::new().with_listing("", vec![vec![file_at("/top.txt", 3)]]);

        walk_and_transfer(&remote, "/", dest.path(), false, &ExcludeFilter::default())
            .await
            .unwrap();

        assert_eq!(remote.calls()[0], "list ");
        assert!(dest.path().join("top.txt").exists());
    }
}
