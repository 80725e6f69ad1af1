/// Persisted record shapes and storage keys.
pub mod models;
/// Progress storage backends and the shared trait.
pub mod progress_store;
/// Storage abstraction error types.
pub mod storage;
