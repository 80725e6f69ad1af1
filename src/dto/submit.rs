use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::puzzle::TimerSnapshot;
use crate::dto::validation::validate_answer_text;

/// Payload carrying one answer submission.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitRequest {
    /// Free-text answer exactly as typed by the player.
    #[validate(custom(function = validate_answer_text))]
    pub answer: String,
}

/// Result of checking one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Answer matched an accepted digest; the puzzle is now completed.
    Correct,
    /// Answer did not match; a fresh penalty window has started.
    Incorrect,
    /// Blank or whitespace-only submission; nothing changed.
    EmptyInput,
    /// Submission attempted while the countdown is still running; nothing
    /// changed and the answer was not checked.
    TimerActive,
}

/// Response to an answer submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResponse {
    /// What happened to this submission.
    pub outcome: SubmitOutcome,
    /// Countdown state after the submission was processed.
    pub timer: TimerSnapshot,
    /// Number of puzzles solved so far.
    pub completed_count: u32,
    /// Number of puzzles in the hunt.
    pub total: u32,
}
