use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the puzzle hunt backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::puzzle::list_puzzles,
        crate::routes::puzzle::view_puzzle,
        crate::routes::puzzle::puzzle_hint,
        crate::routes::puzzle::puzzle_attempts,
        crate::routes::puzzle::next_puzzle,
        crate::routes::puzzle::submit_answer,
        crate::routes::progress::get_progress,
        crate::routes::progress::reset_progress,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::puzzle::PuzzleListResponse,
            crate::dto::puzzle::PuzzleSummary,
            crate::dto::puzzle::PuzzleViewResponse,
            crate::dto::puzzle::HintResponse,
            crate::dto::puzzle::AttemptsResponse,
            crate::dto::puzzle::NextPuzzleResponse,
            crate::dto::puzzle::TimerSnapshot,
            crate::dto::puzzle::TimerPhaseDto,
            crate::dto::submit::SubmitRequest,
            crate::dto::submit::SubmitResponse,
            crate::dto::submit::SubmitOutcome,
            crate::dto::progress::ProgressResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "puzzles", description = "Puzzle pages, hints, and answer submission"),
        (name = "progress", description = "Hunt-wide progress and reset"),
    )
)]
pub struct ApiDoc;
