use serde::Serialize;
use utoipa::ToSchema;

use crate::puzzles::PuzzleId;

/// Overall hunt progress.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressResponse {
    /// Ids of every solved puzzle, in completion order.
    pub completed: Vec<PuzzleId>,
    /// Number of puzzles solved so far.
    pub completed_count: u32,
    /// Number of puzzles in the hunt.
    pub total: u32,
}
