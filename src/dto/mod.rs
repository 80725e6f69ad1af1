/// Health check payloads.
pub mod health;
/// Overall progress payloads.
pub mod progress;
/// Puzzle page and timer payloads.
pub mod puzzle;
/// Answer submission payloads.
pub mod submit;
/// Validation helpers for DTOs.
pub mod validation;
