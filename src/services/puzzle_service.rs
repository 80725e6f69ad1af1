//! Puzzle page services: session activation, views, hints, and navigation.

use std::sync::Arc;

use crate::{
    dao::progress_store::ProgressStore,
    dto::puzzle::{
        AttemptsResponse, HintResponse, NextPuzzleResponse, PuzzleListResponse, PuzzleSummary,
        PuzzleViewResponse, TimerSnapshot,
    },
    error::ServiceError,
    puzzles::PuzzleId,
    services::ticker,
    state::{ActiveSession, PuzzleTimer, SharedState, TimerPhase},
    state::timer::now_unix_ms,
};

fn unknown_puzzle(id: PuzzleId) -> ServiceError {
    ServiceError::NotFound(format!("puzzle `{id}` is not part of the hunt"))
}

/// Make `id` the active session, reconciling its countdown from the persisted
/// record. The previous session's ticker is aborted before it is replaced.
///
/// The caller holds the active-session lock and passes the slot in; the
/// returned reference stays valid for as long as the lock is held.
pub(crate) async fn reconcile<'s>(
    state: &SharedState,
    store: &Arc<dyn ProgressStore>,
    slot: &'s mut Option<ActiveSession>,
    id: PuzzleId,
) -> Result<&'s mut ActiveSession, ServiceError> {
    if !state.catalog().contains(id) {
        return Err(unknown_puzzle(id));
    }

    let session = match slot.take() {
        Some(existing) if existing.puzzle_id == id => existing,
        other => {
            // Switching puzzles: stop the old countdown driver first.
            if let Some(mut previous) = other {
                previous.abort_ticker();
            }
            restore_session(state, store, id).await?
        }
    };

    let session = slot.insert(session);
    if matches!(session.timer.phase(), TimerPhase::Running { .. }) && !session.has_ticker() {
        session.set_ticker(ticker::spawn(state.clone(), id));
    }
    Ok(session)
}

/// Rebuild a session from the persisted timer record, charging elapsed
/// wall-clock time. A record that already ran out while nobody was watching
/// resolves to expired and is removed from the store.
async fn restore_session(
    state: &SharedState,
    store: &Arc<dyn ProgressStore>,
    id: PuzzleId,
) -> Result<ActiveSession, ServiceError> {
    let record = store.timer(id).await?;
    let timer = match &record {
        Some(rec) => PuzzleTimer::restore(rec, now_unix_ms(), state.penalty_seconds()),
        None => PuzzleTimer::fresh(state.penalty_seconds()),
    };

    if record.is_some() && timer.phase() == TimerPhase::Expired {
        store.clear_timer(id).await?;
    }

    Ok(ActiveSession::new(id, timer))
}

/// The `view` entry point: activate the puzzle page and return its content
/// together with the reconciled countdown state.
pub async fn view(state: &SharedState, id: PuzzleId) -> Result<PuzzleViewResponse, ServiceError> {
    let entry = state.catalog().entry(id).ok_or_else(|| unknown_puzzle(id))?;
    let store = state.require_store().await?;

    let timer = {
        let mut guard = state.active().lock().await;
        let session = reconcile(state, &store, &mut guard, id).await?;
        TimerSnapshot::from(&session.timer)
    };

    let completed = store.completed().await?.contains(&id);
    Ok(PuzzleViewResponse {
        id,
        title: entry.title.to_string(),
        body: entry.body.to_string(),
        completed,
        timer,
    })
}

/// Index of every puzzle with completion flags and overall progress.
pub async fn list(state: &SharedState) -> Result<PuzzleListResponse, ServiceError> {
    let store = state.require_store().await?;
    let completed = store.completed().await?;

    let puzzles = state
        .catalog()
        .iter()
        .map(|(id, entry)| PuzzleSummary {
            id,
            title: entry.title.to_string(),
            completed: completed.contains(&id),
        })
        .collect();

    Ok(PuzzleListResponse {
        puzzles,
        completed_count: completed.len() as u32,
        total: state.catalog().total(),
    })
}

/// Hint text for a puzzle.
pub async fn hint(state: &SharedState, id: PuzzleId) -> Result<HintResponse, ServiceError> {
    let entry = state.catalog().entry(id).ok_or_else(|| unknown_puzzle(id))?;
    Ok(HintResponse {
        id,
        hint: entry.hint.to_string(),
    })
}

/// Raw answers previously submitted for a puzzle, in submission order.
pub async fn attempts(state: &SharedState, id: PuzzleId) -> Result<AttemptsResponse, ServiceError> {
    if !state.catalog().contains(id) {
        return Err(unknown_puzzle(id));
    }
    let store = state.require_store().await?;
    let attempts = store.attempts(id).await?;
    Ok(AttemptsResponse { id, attempts })
}

/// The `next` entry point: where to navigate after the given puzzle.
pub async fn next(state: &SharedState, id: PuzzleId) -> Result<NextPuzzleResponse, ServiceError> {
    if !state.catalog().contains(id) {
        return Err(unknown_puzzle(id));
    }
    let next_id = state.catalog().next_id(id);
    Ok(NextPuzzleResponse {
        end_of_hunt: next_id.is_none(),
        next_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::TimerRecordEntity,
        dao::progress_store::memory::MemoryProgressStore,
        dto::puzzle::TimerPhaseDto,
        puzzles::{AnswerRegistry, PuzzleCatalog},
        state::AppState,
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

    #[tokio::test]
    async fn view_of_fresh_puzzle_allows_submission() {
        let (state, _store) = state_with_store().await;
        let page = view(&state, 1).await.unwrap();
        assert_eq!(page.id, 1);
        assert!(!page.completed);
        assert_eq!(page.timer.phase, TimerPhaseDto::Fresh);
        assert!(page.timer.can_submit);
    }

    #[tokio::test]
    async fn view_resumes_a_persisted_countdown() {
        let (state, store) = state_with_store().await;
        store
            .save_timer(
                3,
                TimerRecordEntity {
                    time_remaining: 30,
                    can_submit: false,
                    has_attempted: true,
                    timestamp: now_unix_ms() - 10_000,
                },
            )
            .await
            .unwrap();

        let page = view(&state, 3).await.unwrap();
        assert_eq!(page.timer.phase, TimerPhaseDto::Running);
        // Ten elapsed seconds are charged against the persisted remainder.
        assert!(page.timer.remaining_seconds <= 20);
        assert!(page.timer.remaining_seconds >= 19);
        assert!(!page.timer.can_submit);
    }

    #[tokio::test]
    async fn view_clears_an_overdue_record() {
        let (state, store) = state_with_store().await;
        store
            .save_timer(
                4,
                TimerRecordEntity {
                    time_remaining: 30,
                    can_submit: false,
                    has_attempted: true,
                    timestamp: now_unix_ms() - 45_000,
                },
            )
            .await
            .unwrap();

        let page = view(&state, 4).await.unwrap();
        assert_eq!(page.timer.phase, TimerPhaseDto::Expired);
        assert!(page.timer.can_submit);
        assert!(store.timer(4).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn switching_puzzles_replaces_the_session() {
        let (state, _store) = state_with_store().await;
        view(&state, 1).await.unwrap();
        view(&state, 2).await.unwrap();

        let guard = state.active().lock().await;
        assert_eq!(guard.as_ref().map(|s| s.puzzle_id), Some(2));
    }

    #[tokio::test]
    async fn unknown_puzzle_is_not_found() {
        let (state, _store) = state_with_store().await;
        assert!(matches!(
            view(&state, 99).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            hint(&state, 0).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            next(&state, 15).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn degraded_mode_rejects_views() {
        let state = AppState::with_parts(
            PuzzleCatalog::builtin(),
            AnswerRegistry::builtin(),
            60,
        );
        assert!(matches!(
            view(&state, 1).await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn next_walks_forward_and_flags_the_end() {
        let (state, _store) = state_with_store().await;

        let mid = next(&state, 7).await.unwrap();
        assert_eq!(mid.next_id, Some(8));
        assert!(!mid.end_of_hunt);

        let last = next(&state, 14).await.unwrap();
        assert_eq!(last.next_id, None);
        assert!(last.end_of_hunt);
    }

    #[tokio::test]
    async fn list_reports_completion_flags() {
        let (state, store) = state_with_store().await;
        store.add_completed(2).await.unwrap();
        store.add_completed(5).await.unwrap();

        let index = list(&state).await.unwrap();
        assert_eq!(index.total, 14);
        assert_eq!(index.completed_count, 2);
        assert!(index.puzzles.iter().find(|p| p.id == 2).unwrap().completed);
        assert!(!index.puzzles.iter().find(|p| p.id == 3).unwrap().completed);
    }
}
