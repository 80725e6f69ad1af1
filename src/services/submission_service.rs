//! The submission controller: hashing, registry lookup, timer transitions,
//! and persistence writes for one answer attempt.

use std::sync::Arc;

use crate::{
    dao::progress_store::ProgressStore,
    dto::{
        puzzle::TimerSnapshot,
        submit::{SubmitOutcome, SubmitResponse},
    },
    error::ServiceError,
    puzzles::{PuzzleId, answer_digest},
    services::{puzzle_service, ticker},
    state::{PuzzleTimer, SharedState},
    state::timer::now_unix_ms,
};

/// Check one answer submission for a puzzle.
///
/// The flow is fixed: empty input is rejected before anything else; a
/// running countdown rejects the attempt without hashing or logging it; an
/// answer that reaches the check is logged exactly once whatever its
/// outcome. A miss re-arms a full penalty window, a hit clears the timer
/// record and marks the puzzle completed.
pub async fn submit(
    state: &SharedState,
    id: PuzzleId,
    answer: &str,
) -> Result<SubmitResponse, ServiceError> {
    let store = state.require_store().await?;
    let mut guard = state.active().lock().await;
    let session = puzzle_service::reconcile(state, &store, &mut guard, id).await?;

    let trimmed = answer.trim();
    if trimmed.is_empty() {
        let timer = TimerSnapshot::from(&session.timer);
        drop(guard);
        return respond(state, &store, SubmitOutcome::EmptyInput, timer).await;
    }

    session.timer.note_attempt();

    if !session.timer.can_submit() {
        let timer = TimerSnapshot::from(&session.timer);
        drop(guard);
        return respond(state, &store, SubmitOutcome::TimerActive, timer).await;
    }

    let digest = answer_digest(trimmed);
    store.append_attempt(id, trimmed.to_string()).await?;

    let outcome = if state.registry().is_accepted(id, &digest) {
        session.abort_ticker();
        session.timer = PuzzleTimer::fresh(state.penalty_seconds());
        store.clear_timer(id).await?;
        store.add_completed(id).await?;
        SubmitOutcome::Correct
    } else {
        session.timer.arm();
        store.save_timer(id, session.timer.record(now_unix_ms())).await?;
        session.set_ticker(ticker::spawn(state.clone(), id));
        SubmitOutcome::Incorrect
    };

    let timer = TimerSnapshot::from(&session.timer);
    drop(guard);
    respond(state, &store, outcome, timer).await
}

async fn respond(
    state: &SharedState,
    store: &Arc<dyn ProgressStore>,
    outcome: SubmitOutcome,
    timer: TimerSnapshot,
) -> Result<SubmitResponse, ServiceError> {
    let completed = store.completed().await?;
    Ok(SubmitResponse {
        outcome,
        timer,
        completed_count: completed.len() as u32,
        total: state.catalog().total(),
    })
}

#[cfg(test)]
mod tests {
    use indexmap::{IndexMap, IndexSet};

    use super::*;
    use crate::{
        dao::progress_store::memory::MemoryProgressStore,
        dto::puzzle::TimerPhaseDto,
        puzzles::{AnswerRegistry, PuzzleCatalog},
        state::AppState,
    };

    /// State whose registry accepts "haha" for puzzle 1, over the shipped
    /// catalog so every id in 1..=14 is viewable.
    async fn test_state() -> (SharedState, MemoryProgressStore) {
        let mut accepted: IndexMap<u32, IndexSet<String>> = IndexMap::new();
        accepted.insert(1, [answer_digest("haha")].into_iter().collect());
        let state = AppState::with_parts(
            PuzzleCatalog::builtin(),
            AnswerRegistry::new(accepted),
            60,
        );
        let store = MemoryProgressStore::new();
        state
            .install_store(Arc::new(store.clone()) as Arc<dyn ProgressStore>)
            .await;
        (state, store)
    }

    #[tokio::test]
    async fn correct_answer_completes_the_puzzle() {
        let (state, store) = test_state().await;

        let response = submit(&state, 1, "haha").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::Correct);
        assert_eq!(response.completed_count, 1);
        assert_eq!(response.total, 14);

        assert!(store.completed().await.unwrap().contains(&1));
        assert!(store.timer(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn correct_answer_normalizes_case_and_whitespace() {
        let (state, store) = test_state().await;
        let response = submit(&state, 1, "  HaHa  ").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::Correct);
        // The attempt log keeps the pre-normalization text.
        assert_eq!(store.attempts(1).await.unwrap(), vec!["HaHa"]);
    }

    #[tokio::test]
    async fn wrong_answer_arms_a_full_penalty_window() {
        let (state, store) = test_state().await;

        let response = submit(&state, 1, "wrong").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::Incorrect);
        assert_eq!(response.timer.phase, TimerPhaseDto::Running);
        assert_eq!(response.timer.remaining_seconds, 60);
        assert!(!response.timer.can_submit);
        assert!(response.timer.has_attempted);

        let record = store.timer(1).await.unwrap().expect("record persisted");
        assert_eq!(record.time_remaining, 60);
        assert!(!record.can_submit);
        assert!(record.has_attempted);

        assert_eq!(store.attempts(1).await.unwrap(), vec!["wrong"]);
        assert!(store.completed().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn gated_submission_is_rejected_without_logging() {
        let (state, store) = test_state().await;
        submit(&state, 1, "wrong").await.unwrap();

        // Even the right answer bounces while the countdown runs, and the
        // attempt log must not grow.
        let response = submit(&state, 1, "haha").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::TimerActive);
        assert_eq!(store.attempts(1).await.unwrap(), vec!["wrong"]);
        assert!(store.completed().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_submission_mutates_nothing() {
        let (state, store) = test_state().await;

        let response = submit(&state, 1, "   ").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::EmptyInput);
        assert_eq!(response.timer.phase, TimerPhaseDto::Fresh);
        assert!(store.attempts(1).await.unwrap().is_empty());
        assert!(store.timer(1).await.unwrap().is_none());
        assert!(store.completed().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_wrong_answer_is_logged_once() {
        let (state, store) = test_state().await;
        submit(&state, 1, "wrong").await.unwrap();

        // Fast-forward the session past the penalty window.
        {
            let mut guard = state.active().lock().await;
            let session = guard.as_mut().unwrap();
            while session.timer.remaining() > 0 {
                session.timer.tick();
            }
        }

        let response = submit(&state, 1, "wrong").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::Incorrect);
        assert_eq!(store.attempts(1).await.unwrap(), vec!["wrong"]);
    }

    #[tokio::test]
    async fn expired_window_rearms_on_the_next_miss() {
        let (state, store) = test_state().await;
        submit(&state, 1, "wrong").await.unwrap();

        {
            let mut guard = state.active().lock().await;
            let session = guard.as_mut().unwrap();
            while session.timer.remaining() > 0 {
                session.timer.tick();
            }
            assert!(session.timer.can_submit());
        }

        let response = submit(&state, 1, "still wrong").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::Incorrect);
        assert_eq!(response.timer.remaining_seconds, 60);
        let record = store.timer(1).await.unwrap().expect("re-armed record");
        assert_eq!(record.time_remaining, 60);
    }

    #[tokio::test]
    async fn solving_after_expiry_clears_everything() {
        let (state, store) = test_state().await;
        submit(&state, 1, "wrong").await.unwrap();
        {
            let mut guard = state.active().lock().await;
            let session = guard.as_mut().unwrap();
            while session.timer.remaining() > 0 {
                session.timer.tick();
            }
        }

        let response = submit(&state, 1, "haha").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::Correct);
        assert!(store.timer(1).await.unwrap().is_none());
        assert!(store.completed().await.unwrap().contains(&1));
        // Attempt history survives a solve; only a full reset clears it.
        assert_eq!(store.attempts(1).await.unwrap(), vec!["wrong", "haha"]);
    }

    #[tokio::test]
    async fn resolving_a_completed_puzzle_stays_idempotent() {
        let (state, store) = test_state().await;
        submit(&state, 1, "haha").await.unwrap();
        let response = submit(&state, 1, "haha").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::Correct);
        assert_eq!(response.completed_count, 1);
        assert_eq!(store.completed().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_puzzle_is_not_found() {
        let (state, _store) = test_state().await;
        assert!(matches!(
            submit(&state, 99, "haha").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn wrong_answer_on_an_unregistered_puzzle_still_arms() {
        // Puzzle 2 exists in the catalog but the test registry has no
        // digests for it, so every answer misses.
        let (state, store) = test_state().await;
        let response = submit(&state, 2, "lobster").await.unwrap();
        assert_eq!(response.outcome, SubmitOutcome::Incorrect);
        assert!(store.timer(2).await.unwrap().is_some());
    }
}
