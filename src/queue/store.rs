//! Durable FIFO queue of opaque blobs, one turso database per queue name.

use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};
use turso::{Builder, Connection};

use crate::error::{PipelineError, PipelineResult};

/// Database file inside a queue's directory.
pub const QUEUE_DB_FILE: &str = "queue.db";

fn get_table_sql() -> &'static str {
    "
    CREATE TABLE IF NOT EXISTS queue_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        payload BLOB NOT NULL
    );
    "
}

fn storage_err(queue: &str) -> impl Fn(turso::Error) -> PipelineError + '_ {
    move |e| PipelineError::storage(queue, e)
}

/// Open handle on a named queue.
///
/// Pushes are buffered in memory until [`WorkQueue::commit`] or
/// [`WorkQueue::close`]; pops are committed immediately, so an item handed
/// out by `pop` is never delivered again (at-most-once).
pub struct WorkQueue {
    name: String,
    conn: Connection,
    pending: VecDeque<Vec<u8>>,
}

impl WorkQueue {
    /// Open `name` under `root`, creating its storage on first use. Opening
    /// an existing queue resumes its sequence.
    pub async fn open(root: &Path, name: &str) -> PipelineResult<Self> {
        validate_name(name)?;

        let dir = queue_dir(root, name);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            PipelineError::storage(name, format!("cannot create {}: {}", dir.display(), e))
        })?;

        let db_path = dir.join(QUEUE_DB_FILE);
        let db_path = db_path
            .to_str()
            .ok_or_else(|| PipelineError::storage(name, "queue path is not valid UTF-8"))?;

        let db = Builder::new_local(db_path)
            .build()
            .await
            .map_err(storage_err(name))?;
        let conn = db.connect().map_err(storage_err(name))?;
        conn.execute_batch(get_table_sql())
            .await
            .map_err(storage_err(name))?;

        log::debug!("opened queue '{}' at {}", name, db_path);
        Ok(Self {
            name: name.to_string(),
            conn,
            pending: VecDeque::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a blob at the tail. Not durable until the next commit.
    pub fn push(&mut self, blob: Vec<u8>) {
        self.pending.push_back(blob);
    }

    /// Remove and return the head, or `None` when the queue is empty.
    pub async fn pop(&mut self) -> PipelineResult<Option<Vec<u8>>> {
        let head = {
            let mut rows = self
                .conn
                .query(
                    "SELECT id, payload FROM queue_items ORDER BY id LIMIT 1",
                    (),
                )
                .await
                .map_err(storage_err(&self.name))?;

            match rows.next().await.map_err(storage_err(&self.name))? {
                Some(row) => {
                    let id: i64 = row.get(0).map_err(storage_err(&self.name))?;
                    let payload = row.get_value(1).map_err(storage_err(&self.name))?;
                    Some((id, blob_from_value(&self.name, payload)?))
                }
                None => None,
            }
        };

        match head {
            Some((id, payload)) => {
                self.conn
                    .execute(
                        "DELETE FROM queue_items WHERE id = ?1",
                        turso::params![id],
                    )
                    .await
                    .map_err(storage_err(&self.name))?;
                Ok(Some(payload))
            }
            // Committed rows always precede buffered pushes.
            None => Ok(self.pending.pop_front()),
        }
    }

    /// Write all buffered pushes in one transaction. Returns how many items
    /// were committed.
    pub async fn commit(&mut self) -> PipelineResult<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }

        self.conn
            .execute("BEGIN TRANSACTION", ())
            .await
            .map_err(storage_err(&self.name))?;

        for blob in &self.pending {
            if let Err(e) = self
                .conn
                .execute(
                    "INSERT INTO queue_items (payload) VALUES (?1)",
                    vec![turso::Value::Blob(blob.clone())],
                )
                .await
            {
                // Rollback on error
                let _ = self.conn.execute("ROLLBACK", ()).await;
                return Err(PipelineError::storage(&self.name, e));
            }
        }

        self.conn
            .execute("COMMIT", ())
            .await
            .map_err(storage_err(&self.name))?;

        let committed = self.pending.len();
        self.pending.clear();
        log::debug!("queue '{}': committed {} item(s)", self.name, committed);
        Ok(committed)
    }

    /// Commit buffered pushes and release the handle.
    pub async fn close(mut self) -> PipelineResult<()> {
        self.commit().await?;
        Ok(())
    }

    /// Number of items, committed and buffered.
    pub async fn len(&self) -> PipelineResult<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM queue_items", ())
            .await
            .map_err(storage_err(&self.name))?;
        let committed: i64 = match rows.next().await.map_err(storage_err(&self.name))? {
            Some(row) => row.get(0).map_err(storage_err(&self.name))?,
            None => 0,
        };
        Ok(committed as u64 + self.pending.len() as u64)
    }

    pub async fn is_empty(&self) -> PipelineResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Every item in FIFO order, without removing anything.
    pub async fn snapshot(&self) -> PipelineResult<Vec<Vec<u8>>> {
        let mut rows = self
            .conn
            .query("SELECT payload FROM queue_items ORDER BY id", ())
            .await
            .map_err(storage_err(&self.name))?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await.map_err(storage_err(&self.name))? {
            let payload = row.get_value(0).map_err(storage_err(&self.name))?;
            items.push(blob_from_value(&self.name, payload)?);
        }
        items.extend(self.pending.iter().cloned());
        Ok(items)
    }
}

/// A queue name is one plain directory name below the queue root.
fn validate_name(name: &str) -> PipelineResult<()> {
    if name.trim().is_empty() {
        return Err(PipelineError::storage(name, "queue name must not be empty"));
    }
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal || name.contains(['/', '\\']) {
        return Err(PipelineError::storage(
            name,
            "queue name must be a plain name, not a path",
        ));
    }
    Ok(())
}

/// Directory holding the storage of queue `name`.
pub fn queue_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

fn blob_from_value(queue: &str, value: turso::Value) -> PipelineResult<Vec<u8>> {
    match value {
        turso::Value::Blob(bytes) => Ok(bytes),
        turso::Value::Text(text) => Ok(text.into_bytes()),
        other => Err(PipelineError::storage(
            queue,
            format!("unexpected payload column value: {:?}", other),
        )),
    }
}
