use tokio::task::JoinHandle;

use crate::puzzles::PuzzleId;
use crate::state::timer::PuzzleTimer;

/// In-memory mirror of the puzzle currently being viewed.
///
/// At most one session exists at a time; it owns the countdown counters and
/// the handle of the ticker task driving them. The persisted record stays
/// authoritative across page loads, this mirror only while it is installed.
pub struct ActiveSession {
    /// Puzzle this session mirrors.
    pub puzzle_id: PuzzleId,
    /// Countdown state for the mirrored puzzle.
    pub timer: PuzzleTimer,
    ticker: Option<JoinHandle<()>>,
}

impl ActiveSession {
    /// Create a session with no ticker running.
    pub fn new(puzzle_id: PuzzleId, timer: PuzzleTimer) -> Self {
        Self {
            puzzle_id,
            timer,
            ticker: None,
        }
    }

    /// Whether a ticker task is currently attached to this session.
    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    /// Install the ticker task handle, stopping any previous one first.
    pub fn set_ticker(&mut self, handle: JoinHandle<()>) {
        self.abort_ticker();
        self.ticker = Some(handle);
    }

    /// Stop the ticker task if one is running. Must be called before the
    /// session is replaced or dropped; a ticker outliving its session would
    /// keep writing timer records for a puzzle nobody is viewing.
    pub fn abort_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.abort_ticker();
    }
}
