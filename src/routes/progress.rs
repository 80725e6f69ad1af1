use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::progress::ProgressResponse, error::AppError, services::progress_service,
    state::SharedState,
};

/// Routes exposing hunt-wide progress and the full reset.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/progress", get(get_progress))
        .route("/progress/reset", post(reset_progress))
}

/// Completed puzzles and overall completion count.
#[utoipa::path(
    get,
    path = "/progress",
    tag = "progress",
    responses(
        (status = 200, description = "Current progress", body = ProgressResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn get_progress(
    State(state): State<SharedState>,
) -> Result<Json<ProgressResponse>, AppError> {
    let progress = progress_service::progress(&state).await?;
    Ok(Json(progress))
}

/// Wipe all persisted progress: completions, timers, and attempt history.
#[utoipa::path(
    post,
    path = "/progress/reset",
    tag = "progress",
    responses(
        (status = 200, description = "Progress wiped", body = ProgressResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn reset_progress(
    State(state): State<SharedState>,
) -> Result<Json<ProgressResponse>, AppError> {
    let progress = progress_service::reset(&state).await?;
    Ok(Json(progress))
}
