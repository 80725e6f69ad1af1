use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::{
    puzzles::PuzzleId,
    state::{SharedState, TickOutcome},
    state::timer::now_unix_ms,
};

/// Spawn the once-per-second countdown driver for the active session.
///
/// The task stops itself when the countdown expires or when the session no
/// longer mirrors `puzzle_id`; the session additionally aborts the handle
/// when it is replaced, so a puzzle switch never leaks a running ticker.
pub(crate) fn spawn(state: SharedState, puzzle_id: PuzzleId) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first tick completes immediately; skip it so the countdown
        // decrements one full second after arming.
        interval.tick().await;
        loop {
            interval.tick().await;
            if tick_once(&state, puzzle_id).await {
                break;
            }
        }
    })
}

/// Advance the active session's countdown by one second and write the timer
/// record through. Returns `true` when ticking should stop.
///
/// Storage failures are logged and skipped rather than stopping the
/// countdown: the in-memory mirror stays authoritative for this page view
/// and the next successful write catches the store up.
pub(crate) async fn tick_once(state: &SharedState, puzzle_id: PuzzleId) -> bool {
    let store = state.progress_store().await;
    let mut guard = state.active().lock().await;
    let Some(session) = guard.as_mut() else {
        return true;
    };
    if session.puzzle_id != puzzle_id {
        return true;
    }

    match session.timer.tick() {
        TickOutcome::Running { .. } => {
            let record = session.timer.record(now_unix_ms());
            drop(guard);
            if let Some(store) = store
                && let Err(err) = store.save_timer(puzzle_id, record).await
            {
                warn!(puzzle_id, error = %err, "failed to persist timer tick");
            }
            false
        }
        TickOutcome::Expired => {
            drop(guard);
            if let Some(store) = store
                && let Err(err) = store.clear_timer(puzzle_id).await
            {
                warn!(puzzle_id, error = %err, "failed to clear expired timer record");
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dao::progress_store::{ProgressStore, memory::MemoryProgressStore},
        puzzles::{AnswerRegistry, PuzzleCatalog},
        state::{ActiveSession, AppState, PuzzleTimer},
    };

    async fn state_with_store() -> (SharedState, MemoryProgressStore) {
        let state = AppState::with_parts(
            PuzzleCatalog::builtin(),
            AnswerRegistry::builtin(),
            60,
        );
        let store = MemoryProgressStore::new();
        state
            .install_store(Arc::new(store.clone()) as Arc<dyn ProgressStore>)
            .await;
        (state, store)
    }

    async fn install_running_session(state: &SharedState, id: PuzzleId, penalty: u32) {
        let mut timer = PuzzleTimer::fresh(penalty);
        timer.arm();
        let mut guard = state.active().lock().await;
        *guard = Some(ActiveSession::new(id, timer));
    }

    #[tokio::test]
    async fn tick_persists_then_clears_at_zero() {
        let (state, store) = state_with_store().await;
        install_running_session(&state, 1, 2).await;

        assert!(!tick_once(&state, 1).await);
        let record = store.timer(1).await.unwrap().expect("record persisted");
        assert_eq!(record.time_remaining, 1);
        assert!(!record.can_submit);

        assert!(tick_once(&state, 1).await);
        assert!(store.timer(1).await.unwrap().is_none());

        let guard = state.active().lock().await;
        let session = guard.as_ref().expect("session still installed");
        assert!(session.timer.can_submit());
    }

    #[tokio::test]
    async fn tick_stops_when_session_mirrors_another_puzzle() {
        let (state, store) = state_with_store().await;
        install_running_session(&state, 2, 60).await;

        assert!(tick_once(&state, 1).await);
        assert!(store.timer(1).await.unwrap().is_none());
        assert!(store.timer(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn tick_stops_without_a_session() {
        let (state, _store) = state_with_store().await;
        assert!(tick_once(&state, 1).await);
    }
}
