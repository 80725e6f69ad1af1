use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::dao::{
    models::{ATTEMPTS_KEY, COMPLETED_KEY, TIMER_KEY_PREFIX, TimerRecordEntity, timer_key},
    progress_store::{
        ProgressStore, decode_attempts, decode_completed, decode_timer, encode_attempts,
        encode_completed,
    },
    storage::StorageResult,
};
use crate::puzzles::PuzzleId;

/// In-memory progress store used in tests and as a last-resort fallback.
///
/// Keys and value shapes are identical to the file backend so the two are
/// interchangeable behind [`ProgressStore`].
#[derive(Clone, Default)]
pub struct MemoryProgressStore {
    cells: Arc<DashMap<String, Value>>,
}

impl MemoryProgressStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw value under a storage key, bypassing the record codecs.
    ///
    /// Test hook for seeding corrupt or hand-rolled persisted state.
    pub fn insert_raw(&self, key: impl Into<String>, value: Value) {
        self.cells.insert(key.into(), value);
    }
}

impl ProgressStore for MemoryProgressStore {
    fn completed(&self) -> BoxFuture<'static, StorageResult<indexmap::IndexSet<PuzzleId>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(decode_completed(
                store.cells.get(COMPLETED_KEY).as_deref(),
            ))
        })
    }

    fn add_completed(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut set = decode_completed(store.cells.get(COMPLETED_KEY).as_deref());
            if set.insert(id) {
                store
                    .cells
                    .insert(COMPLETED_KEY.into(), encode_completed(&set));
            }
            Ok(())
        })
    }

    fn timer(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<Option<TimerRecordEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(decode_timer(store.cells.get(&timer_key(id)).as_deref())) })
    }

    fn save_timer(
        &self,
        id: PuzzleId,
        record: TimerRecordEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let value = serde_json::to_value(&record).unwrap_or(Value::Null);
            store.cells.insert(timer_key(id), value);
            Ok(())
        })
    }

    fn clear_timer(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.cells.remove(&timer_key(id));
            Ok(())
        })
    }

    fn attempts(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let store = self.clone();
        Box::pin(async move {
            let log = decode_attempts(store.cells.get(ATTEMPTS_KEY).as_deref());
            Ok(log.get(&id.to_string()).cloned().unwrap_or_default())
        })
    }

    fn append_attempt(&self, id: PuzzleId, answer: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut log = decode_attempts(store.cells.get(ATTEMPTS_KEY).as_deref());
            let entries = log.entry(id.to_string()).or_default();
            if !entries.iter().any(|seen| seen == &answer) {
                entries.push(answer);
                store
                    .cells
                    .insert(ATTEMPTS_KEY.into(), encode_attempts(&log));
            }
            Ok(())
        })
    }

    fn reset_all(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .cells
                .retain(|key, _| key != COMPLETED_KEY && key != ATTEMPTS_KEY && !key.starts_with(TIMER_KEY_PREFIX));
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
