use time::OffsetDateTime;

use crate::dao::models::TimerRecordEntity;

/// Default resubmission penalty after a wrong guess, in seconds.
pub const DEFAULT_PENALTY_SECONDS: u32 = 60;

/// Current wall-clock instant in milliseconds since the Unix epoch.
pub fn now_unix_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Observable phase of a puzzle's countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Never attempted: submission allowed, no countdown shown.
    Fresh,
    /// Countdown active: submission blocked until it reaches zero.
    Running {
        /// Seconds left before submission unlocks.
        remaining: u32,
    },
    /// Countdown elapsed: submission allowed again.
    Expired,
}

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down; the updated record should be persisted.
    Running {
        /// Seconds left after this tick.
        remaining: u32,
    },
    /// Reached zero on this tick; the persisted record should be cleared.
    Expired,
}

/// Per-puzzle countdown gating resubmission after a wrong guess.
///
/// Pure state: persistence and scheduling live with the caller. The timer
/// exists to impose think time after each miss, never before the first
/// guess, so a fresh puzzle always allows submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleTimer {
    remaining: u32,
    can_submit: bool,
    has_attempted: bool,
    penalty_seconds: u32,
}

impl PuzzleTimer {
    /// Timer for a puzzle that has never been attempted.
    pub fn fresh(penalty_seconds: u32) -> Self {
        Self {
            remaining: penalty_seconds,
            can_submit: true,
            has_attempted: false,
            penalty_seconds,
        }
    }

    /// Reconstruct a timer from a persisted record, charging the wall-clock
    /// time elapsed since it was saved against the countdown. A record whose
    /// corrected remainder is zero or less resolves to [`TimerPhase::Expired`]
    /// even if the stale record was never cleared.
    pub fn restore(record: &TimerRecordEntity, now_ms: i64, penalty_seconds: u32) -> Self {
        let elapsed_seconds = (now_ms.saturating_sub(record.timestamp)) / 1000;
        let remaining = u32::try_from(i64::from(record.time_remaining) - elapsed_seconds.max(0))
            .unwrap_or(0);
        Self {
            remaining,
            can_submit: record.can_submit || remaining == 0,
            has_attempted: record.has_attempted,
            penalty_seconds,
        }
    }

    /// Phase derived from the current counters.
    pub fn phase(&self) -> TimerPhase {
        if !self.has_attempted {
            TimerPhase::Fresh
        } else if !self.can_submit && self.remaining > 0 {
            TimerPhase::Running {
                remaining: self.remaining,
            }
        } else {
            TimerPhase::Expired
        }
    }

    /// Whether a submission would currently be accepted for checking.
    pub fn can_submit(&self) -> bool {
        self.can_submit
    }

    /// Whether any answer has ever been submitted for this puzzle.
    pub fn has_attempted(&self) -> bool {
        self.has_attempted
    }

    /// Seconds left on the countdown.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Record that a non-empty answer was submitted. Does not start the
    /// countdown; only a miss does that, via [`PuzzleTimer::arm`].
    pub fn note_attempt(&mut self) {
        self.has_attempted = true;
    }

    /// Re-arm the countdown after a wrong guess: full penalty duration,
    /// submission blocked.
    pub fn arm(&mut self) {
        self.remaining = self.penalty_seconds;
        self.can_submit = false;
        self.has_attempted = true;
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.can_submit = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Snapshot the counters into a persistable record stamped `now_ms`.
    pub fn record(&self, now_ms: i64) -> TimerRecordEntity {
        TimerRecordEntity {
            time_remaining: self.remaining,
            can_submit: self.can_submit,
            has_attempted: self.has_attempted,
            timestamp: now_ms,
        }
    }
}
