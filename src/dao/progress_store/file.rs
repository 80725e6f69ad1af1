use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::dao::{
    models::{ATTEMPTS_KEY, COMPLETED_KEY, TIMER_KEY_PREFIX, TimerRecordEntity, timer_key},
    progress_store::{
        ProgressStore, decode_attempts, decode_completed, decode_timer, encode_attempts,
        encode_completed,
    },
    storage::{StorageError, StorageResult},
};
use crate::puzzles::PuzzleId;

/// File-backed progress store: one JSON document holding the whole keyspace,
/// the durable analog of the browser's per-origin key-value storage.
///
/// Every mutation rewrites the document through a rename so a crash mid-write
/// leaves either the old or the new content, never a torn file. A document
/// that fails to parse on open is treated as empty and overwritten by the
/// next write.
#[derive(Clone)]
pub struct FileProgressStore {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    cells: Mutex<IndexMap<String, Value>>,
}

impl FileProgressStore {
    /// Open the progress document at `path`, creating parent directories as
    /// needed. A missing document starts the hunt from scratch.
    pub fn connect(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| {
                StorageError::unavailable(
                    format!("creating data directory `{}`", parent.display()),
                    source,
                )
            })?;
        }

        let cells = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<IndexMap<String, Value>>(&contents) {
                Ok(map) => map,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "progress document is corrupt; starting from an empty keyspace"
                    );
                    IndexMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => IndexMap::new(),
            Err(source) => {
                return Err(StorageError::unavailable(
                    format!("reading progress document `{}`", path.display()),
                    source,
                ));
            }
        };

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                cells: Mutex::new(cells),
            }),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Value>> {
        // A poisoned lock means a panic while holding it; the map itself is
        // still a coherent snapshot, so keep serving it.
        self.inner
            .cells
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, cells: &IndexMap<String, Value>) -> StorageResult<()> {
        let contents = serde_json::to_string_pretty(cells).map_err(|source| {
            StorageError::unavailable("encoding progress document".into(), source)
        })?;

        let tmp = self.inner.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|source| {
            StorageError::unavailable(format!("writing `{}`", tmp.display()), source)
        })?;
        fs::rename(&tmp, &self.inner.path).map_err(|source| {
            StorageError::unavailable(
                format!("replacing `{}`", self.inner.path.display()),
                source,
            )
        })
    }

    fn mutate(
        &self,
        apply: impl FnOnce(&mut IndexMap<String, Value>) -> bool,
    ) -> StorageResult<()> {
        let mut cells = self.lock();
        if apply(&mut cells) {
            self.persist(&cells)?;
        }
        Ok(())
    }
}

impl ProgressStore for FileProgressStore {
    fn completed(&self) -> BoxFuture<'static, StorageResult<indexmap::IndexSet<PuzzleId>>> {
        let store = self.clone();
        Box::pin(async move { Ok(decode_completed(store.lock().get(COMPLETED_KEY))) })
    }

    fn add_completed(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.mutate(|cells| {
                let mut set = decode_completed(cells.get(COMPLETED_KEY));
                if set.insert(id) {
                    cells.insert(COMPLETED_KEY.into(), encode_completed(&set));
                    true
                } else {
                    false
                }
            })
        })
    }

    fn timer(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<Option<TimerRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(decode_timer(store.lock().get(&timer_key(id)))) })
    }

    fn save_timer(
        &self,
        id: PuzzleId,
        record: TimerRecordEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let value = serde_json::to_value(&record).unwrap_or(Value::Null);
            store.mutate(|cells| {
                cells.insert(timer_key(id), value);
                true
            })
        })
    }

    fn clear_timer(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.mutate(|cells| cells.shift_remove(&timer_key(id)).is_some()) })
    }

    fn attempts(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let store = self.clone();
        Box::pin(async move {
            let log = decode_attempts(store.lock().get(ATTEMPTS_KEY));
            Ok(log.get(&id.to_string()).cloned().unwrap_or_default())
        })
    }

    fn append_attempt(&self, id: PuzzleId, answer: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.mutate(|cells| {
                let mut log = decode_attempts(cells.get(ATTEMPTS_KEY));
                let entries = log.entry(id.to_string()).or_default();
                if entries.iter().any(|seen| seen == &answer) {
                    false
                } else {
                    entries.push(answer);
                    cells.insert(ATTEMPTS_KEY.into(), encode_attempts(&log));
                    true
                }
            })
        })
    }

    fn reset_all(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.mutate(|cells| {
                let before = cells.len();
                cells.retain(|key, _| {
                    key != COMPLETED_KEY
                        && key != ATTEMPTS_KEY
                        && !key.starts_with(TIMER_KEY_PREFIX)
                });
                cells.len() != before
            })
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let cells = store.lock();
            store.persist(&cells)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(remaining: u32) -> TimerRecordEntity {
        TimerRecordEntity {
            time_remaining: remaining,
            can_submit: false,
            has_attempted: true,
            timestamp: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn progress_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let store = FileProgressStore::connect(&path).unwrap();
        store.add_completed(1).await.unwrap();
        store.save_timer(2, record(30)).await.unwrap();
        store.append_attempt(2, "wrong".into()).await.unwrap();
        drop(store);

        let reopened = FileProgressStore::connect(&path).unwrap();
        assert!(reopened.completed().await.unwrap().contains(&1));
        assert_eq!(reopened.timer(2).await.unwrap(), Some(record(30)));
        assert_eq!(reopened.attempts(2).await.unwrap(), vec!["wrong"]);
    }

    #[tokio::test]
    async fn corrupt_document_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileProgressStore::connect(&path).unwrap();
        assert!(store.completed().await.unwrap().is_empty());

        // Writes replace the corrupt document with a valid one.
        store.add_completed(9).await.unwrap();
        let reopened = FileProgressStore::connect(&path).unwrap();
        assert!(reopened.completed().await.unwrap().contains(&9));
    }

    #[tokio::test]
    async fn document_uses_contract_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let store = FileProgressStore::connect(&path).unwrap();
        store.add_completed(3).await.unwrap();
        store.save_timer(5, record(12)).await.unwrap();
        store.append_attempt(5, "a guess".into()).await.unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document["completedPuzzles"], serde_json::json!(["3"]));
        assert_eq!(document["puzzleTimer_5"]["timeRemaining"], 12);
        assert_eq!(document["attemptedAnswers"]["5"], serde_json::json!(["a guess"]));
    }

    #[tokio::test]
    async fn reset_all_empties_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let store = FileProgressStore::connect(&path).unwrap();
        store.add_completed(1).await.unwrap();
        store.save_timer(1, record(59)).await.unwrap();
        store.append_attempt(1, "nope".into()).await.unwrap();
        store.reset_all().await.unwrap();

        let reopened = FileProgressStore::connect(&path).unwrap();
        assert!(reopened.completed().await.unwrap().is_empty());
        assert!(reopened.timer(1).await.unwrap().is_none());
        assert!(reopened.attempts(1).await.unwrap().is_empty());
    }
}
