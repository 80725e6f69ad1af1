//! Hunt-wide progress reads and the full reset.

use crate::{dto::progress::ProgressResponse, error::ServiceError, state::SharedState};

/// Completed puzzles and the overall completion count.
pub async fn progress(state: &SharedState) -> Result<ProgressResponse, ServiceError> {
    let store = state.require_store().await?;
    let completed = store.completed().await?;
    Ok(ProgressResponse {
        completed_count: completed.len() as u32,
        completed: completed.into_iter().collect(),
        total: state.catalog().total(),
    })
}

/// Wipe every persisted trace of the hunt: completions, timer records, and
/// attempt history. The active session is dropped so the next page view
/// starts from a fresh timer.
pub async fn reset(state: &SharedState) -> Result<ProgressResponse, ServiceError> {
    let store = state.require_store().await?;

    {
        let mut guard = state.active().lock().await;
        if let Some(mut session) = guard.take() {
            session.abort_ticker();
        }
    }

    store.reset_all().await?;
    Ok(ProgressResponse {
        completed: Vec::new(),
        completed_count: 0,
        total: state.catalog().total(),
    })
}
