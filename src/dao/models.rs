use serde::{Deserialize, Serialize};

use crate::puzzles::PuzzleId;

/// Persisted countdown state for a single puzzle.
///
/// Field names follow the storage contract (`puzzleTimer_<id>` keys hold a
/// camelCase JSON object) so existing progress files stay readable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecordEntity {
    /// Seconds left on the countdown when the record was written.
    pub time_remaining: u32,
    /// Whether submission was allowed at save time.
    pub can_submit: bool,
    /// Whether the puzzle has seen at least one answer attempt.
    pub has_attempted: bool,
    /// Wall-clock save instant in milliseconds since the Unix epoch. Elapsed
    /// real time is charged against the countdown on restore, so navigating
    /// away does not pause the penalty.
    pub timestamp: i64,
}

/// Storage key holding the completed puzzle set (JSON array of id strings).
pub const COMPLETED_KEY: &str = "completedPuzzles";

/// Storage key holding the attempt log (JSON object, id string to raw answers).
pub const ATTEMPTS_KEY: &str = "attemptedAnswers";

/// Storage key holding the timer record for one puzzle.
pub fn timer_key(id: PuzzleId) -> String {
    format!("puzzleTimer_{id}")
}

/// Prefix shared by every timer record key, used when clearing them in bulk.
pub const TIMER_KEY_PREFIX: &str = "puzzleTimer_";
