#[cfg(feature = "file-store")]
pub mod file;
pub mod memory;

use futures::future::BoxFuture;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::dao::models::TimerRecordEntity;
use crate::dao::storage::StorageResult;
use crate::puzzles::PuzzleId;

/// Abstraction over the persistence layer for hunt progress.
///
/// Three independent records share one keyspace: the completed puzzle set,
/// one timer record per puzzle, and the per-puzzle attempt log. Every
/// mutating call writes through immediately; there is no batching.
pub trait ProgressStore: Send + Sync {
    /// Ids of every solved puzzle, in completion order.
    fn completed(&self) -> BoxFuture<'static, StorageResult<IndexSet<PuzzleId>>>;
    /// Mark a puzzle solved. Adding an already-present id is a no-op.
    fn add_completed(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<()>>;
    /// Persisted countdown state for a puzzle, if any survives.
    fn timer(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<Option<TimerRecordEntity>>>;
    /// Overwrite the countdown state for a puzzle.
    fn save_timer(
        &self,
        id: PuzzleId,
        record: TimerRecordEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Drop the countdown state for a puzzle.
    fn clear_timer(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<()>>;
    /// Raw answers previously submitted for a puzzle, in submission order.
    fn attempts(&self, id: PuzzleId) -> BoxFuture<'static, StorageResult<Vec<String>>>;
    /// Record a submitted answer. Exact duplicates are suppressed.
    fn append_attempt(
        &self,
        id: PuzzleId,
        answer: String,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Wipe the completed set, every timer record, and the attempt log.
    fn reset_all(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Probe whether the backend can still service writes.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

// Codec helpers shared by the backends. All decoding degrades to the default
// on malformed input instead of erroring; the next write replaces the value.

pub(crate) fn decode_completed(value: Option<&Value>) -> IndexSet<PuzzleId> {
    let Some(value) = value else {
        return IndexSet::new();
    };
    let Ok(raw) = serde_json::from_value::<Vec<String>>(value.clone()) else {
        return IndexSet::new();
    };
    raw.iter().filter_map(|id| id.parse().ok()).collect()
}

pub(crate) fn encode_completed(set: &IndexSet<PuzzleId>) -> Value {
    Value::from(set.iter().map(|id| id.to_string()).collect::<Vec<_>>())
}

pub(crate) fn decode_attempts(value: Option<&Value>) -> IndexMap<String, Vec<String>> {
    let Some(value) = value else {
        return IndexMap::new();
    };
    serde_json::from_value(value.clone()).unwrap_or_default()
}

pub(crate) fn encode_attempts(log: &IndexMap<String, Vec<String>>) -> Value {
    serde_json::to_value(log).unwrap_or(Value::Null)
}

pub(crate) fn decode_timer(value: Option<&Value>) -> Option<TimerRecordEntity> {
    serde_json::from_value(value?.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completed_roundtrip_keeps_order() {
        let set: IndexSet<PuzzleId> = [3, 1, 7].into_iter().collect();
        let decoded = decode_completed(Some(&encode_completed(&set)));
        assert_eq!(decoded, set);
    }

    #[test]
    fn malformed_completed_decodes_empty() {
        assert!(decode_completed(Some(&json!({"not": "an array"}))).is_empty());
        assert!(decode_completed(Some(&json!(42))).is_empty());
        assert!(decode_completed(None).is_empty());
    }

    #[test]
    fn non_numeric_completed_entries_are_skipped() {
        let decoded = decode_completed(Some(&json!(["2", "bogus", "5"])));
        assert_eq!(decoded, [2, 5].into_iter().collect::<IndexSet<_>>());
    }

    #[test]
    fn malformed_timer_decodes_absent() {
        assert!(decode_timer(Some(&json!("garbage"))).is_none());
        assert!(decode_timer(Some(&json!({"timeRemaining": "nope"}))).is_none());
        assert!(decode_timer(None).is_none());
    }

    #[test]
    fn timer_record_uses_camel_case_fields() {
        let record = decode_timer(Some(&json!({
            "timeRemaining": 42,
            "canSubmit": false,
            "hasAttempted": true,
            "timestamp": 1_700_000_000_000_i64,
        })))
        .expect("record decodes");
        assert_eq!(record.time_remaining, 42);
        assert!(!record.can_submit);
        assert!(record.has_attempted);
    }
}
