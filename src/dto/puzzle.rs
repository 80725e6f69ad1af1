use serde::Serialize;
use utoipa::ToSchema;

use crate::puzzles::PuzzleId;
use crate::state::{PuzzleTimer, TimerPhase};

/// Countdown phase as exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhaseDto {
    /// No attempt yet; submission allowed.
    Fresh,
    /// Countdown active; submission blocked.
    Running,
    /// Countdown elapsed; submission allowed again.
    Expired,
}

/// Snapshot of a puzzle's countdown state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimerSnapshot {
    /// Current countdown phase.
    pub phase: TimerPhaseDto,
    /// Seconds left before submission unlocks; zero outside `running`.
    pub remaining_seconds: u32,
    /// Whether a submission would currently be checked.
    pub can_submit: bool,
    /// Whether any answer has been submitted for this puzzle.
    pub has_attempted: bool,
}

impl From<&PuzzleTimer> for TimerSnapshot {
    fn from(timer: &PuzzleTimer) -> Self {
        let (phase, remaining_seconds) = match timer.phase() {
            TimerPhase::Fresh => (TimerPhaseDto::Fresh, 0),
            TimerPhase::Running { remaining } => (TimerPhaseDto::Running, remaining),
            TimerPhase::Expired => (TimerPhaseDto::Expired, 0),
        };
        Self {
            phase,
            remaining_seconds,
            can_submit: timer.can_submit(),
            has_attempted: timer.has_attempted(),
        }
    }
}

/// One row of the puzzle index.
#[derive(Debug, Serialize, ToSchema)]
pub struct PuzzleSummary {
    pub id: PuzzleId,
    pub title: String,
    pub completed: bool,
}

/// Full puzzle index with overall progress.
#[derive(Debug, Serialize, ToSchema)]
pub struct PuzzleListResponse {
    pub puzzles: Vec<PuzzleSummary>,
    pub completed_count: u32,
    pub total: u32,
}

/// Puzzle page payload returned by the view endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct PuzzleViewResponse {
    pub id: PuzzleId,
    pub title: String,
    pub body: String,
    pub completed: bool,
    /// Countdown state reconciled from persistence on view.
    pub timer: TimerSnapshot,
}

/// Hint text for one puzzle.
#[derive(Debug, Serialize, ToSchema)]
pub struct HintResponse {
    pub id: PuzzleId,
    pub hint: String,
}

/// Raw answers previously submitted for one puzzle, in submission order.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttemptsResponse {
    pub id: PuzzleId,
    pub attempts: Vec<String>,
}

/// Where to go after the current puzzle.
#[derive(Debug, Serialize, ToSchema)]
pub struct NextPuzzleResponse {
    /// Id of the following puzzle, absent past the end of the hunt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_id: Option<PuzzleId>,
    /// True when the current puzzle is the last one.
    pub end_of_hunt: bool,
}
