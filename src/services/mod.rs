/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Overall progress queries and the full reset.
pub mod progress_service;
/// Puzzle page views, hints, and navigation.
pub mod puzzle_service;
/// The answer submission controller.
pub mod submission_service;
/// Once-per-second countdown driver.
pub mod ticker;
/// Storage connection supervisor.
pub mod storage_supervisor;
