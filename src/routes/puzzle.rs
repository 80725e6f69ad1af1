use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::{
        puzzle::{
            AttemptsResponse, HintResponse, NextPuzzleResponse, PuzzleListResponse,
            PuzzleViewResponse,
        },
        submit::{SubmitRequest, SubmitResponse},
    },
    error::AppError,
    puzzles::PuzzleId,
    services::{puzzle_service, submission_service},
    state::SharedState,
};

/// Routes serving puzzle pages and the answer submission endpoint.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/puzzles", get(list_puzzles))
        .route("/puzzles/{id}", get(view_puzzle))
        .route("/puzzles/{id}/hint", get(puzzle_hint))
        .route("/puzzles/{id}/attempts", get(puzzle_attempts))
        .route("/puzzles/{id}/next", get(next_puzzle))
        .route("/puzzles/{id}/submit", post(submit_answer))
}

/// List every puzzle with its completion flag.
#[utoipa::path(
    get,
    path = "/puzzles",
    tag = "puzzles",
    responses(
        (status = 200, description = "Puzzle index", body = PuzzleListResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn list_puzzles(
    State(state): State<SharedState>,
) -> Result<Json<PuzzleListResponse>, AppError> {
    let list = puzzle_service::list(&state).await?;
    Ok(Json(list))
}

/// Open a puzzle page: its content plus the reconciled countdown state.
#[utoipa::path(
    get,
    path = "/puzzles/{id}",
    tag = "puzzles",
    params(("id" = u32, Path, description = "Puzzle number, starting at 1")),
    responses(
        (status = 200, description = "Puzzle page", body = PuzzleViewResponse),
        (status = 404, description = "No such puzzle"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn view_puzzle(
    State(state): State<SharedState>,
    Path(id): Path<PuzzleId>,
) -> Result<Json<PuzzleViewResponse>, AppError> {
    let view = puzzle_service::view(&state, id).await?;
    Ok(Json(view))
}

/// Reveal the hint for a puzzle.
#[utoipa::path(
    get,
    path = "/puzzles/{id}/hint",
    tag = "puzzles",
    params(("id" = u32, Path, description = "Puzzle number, starting at 1")),
    responses(
        (status = 200, description = "Hint text", body = HintResponse),
        (status = 404, description = "No such puzzle")
    )
)]
pub async fn puzzle_hint(
    State(state): State<SharedState>,
    Path(id): Path<PuzzleId>,
) -> Result<Json<HintResponse>, AppError> {
    let hint = puzzle_service::hint(&state, id).await?;
    Ok(Json(hint))
}

/// Raw answers previously submitted for a puzzle, in submission order.
#[utoipa::path(
    get,
    path = "/puzzles/{id}/attempts",
    tag = "puzzles",
    params(("id" = u32, Path, description = "Puzzle number, starting at 1")),
    responses(
        (status = 200, description = "Attempt history", body = AttemptsResponse),
        (status = 404, description = "No such puzzle"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn puzzle_attempts(
    State(state): State<SharedState>,
    Path(id): Path<PuzzleId>,
) -> Result<Json<AttemptsResponse>, AppError> {
    let attempts = puzzle_service::attempts(&state, id).await?;
    Ok(Json(attempts))
}

/// Where to navigate after the given puzzle.
#[utoipa::path(
    get,
    path = "/puzzles/{id}/next",
    tag = "puzzles",
    params(("id" = u32, Path, description = "Puzzle number, starting at 1")),
    responses(
        (status = 200, description = "Next puzzle id, or end of hunt", body = NextPuzzleResponse),
        (status = 404, description = "No such puzzle")
    )
)]
pub async fn next_puzzle(
    State(state): State<SharedState>,
    Path(id): Path<PuzzleId>,
) -> Result<Json<NextPuzzleResponse>, AppError> {
    let next = puzzle_service::next(&state, id).await?;
    Ok(Json(next))
}

/// Submit an answer for checking. Rejections (blank input, running
/// countdown) come back as outcomes in a 200 body, never as errors.
#[utoipa::path(
    post,
    path = "/puzzles/{id}/submit",
    tag = "puzzles",
    params(("id" = u32, Path, description = "Puzzle number, starting at 1")),
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Submission processed", body = SubmitResponse),
        (status = 400, description = "Malformed answer payload"),
        (status = 404, description = "No such puzzle"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Path(id): Path<PuzzleId>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    payload.validate()?;
    let response = submission_service::submit(&state, id, &payload.answer).await?;
    Ok(Json(response))
}
