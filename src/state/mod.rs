pub mod session;
pub mod timer;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::{
    config::AppConfig,
    dao::progress_store::ProgressStore,
    error::ServiceError,
    puzzles::{AnswerRegistry, PuzzleCatalog},
};

pub use self::session::ActiveSession;
pub use self::timer::{PuzzleTimer, TickOutcome, TimerPhase};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the static puzzle data, the installed storage
/// backend, and the single active puzzle session.
pub struct AppState {
    store: RwLock<Option<Arc<dyn ProgressStore>>>,
    catalog: PuzzleCatalog,
    registry: AnswerRegistry,
    penalty_seconds: u32,
    active: Mutex<Option<ActiveSession>>,
}

impl AppState {
    /// Construct the shared state for the shipped hunt.
    ///
    /// The application starts in degraded mode until a storage backend is
    /// installed by the supervisor.
    pub fn new(config: &AppConfig) -> SharedState {
        Self::with_parts(
            PuzzleCatalog::builtin(),
            AnswerRegistry::builtin(),
            config.penalty_seconds(),
        )
    }

    /// Construct shared state from explicit puzzle data. Used by tests to run
    /// the submission flow against a purpose-built registry.
    pub fn with_parts(
        catalog: PuzzleCatalog,
        registry: AnswerRegistry,
        penalty_seconds: u32,
    ) -> SharedState {
        Arc::new(Self {
            store: RwLock::new(None),
            catalog,
            registry,
            penalty_seconds,
            active: Mutex::new(None),
        })
    }

    /// Obtain a handle to the current progress store, if one is installed.
    pub async fn progress_store(&self) -> Option<Arc<dyn ProgressStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Progress store handle, or [`ServiceError::Degraded`] when none is
    /// installed.
    pub async fn require_store(&self) -> Result<Arc<dyn ProgressStore>, ServiceError> {
        self.progress_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a storage backend and leave degraded mode.
    pub async fn install_store(&self, store: Arc<dyn ProgressStore>) {
        let mut guard = self.store.write().await;
        *guard = Some(store);
    }

    /// Remove the storage backend and enter degraded mode.
    pub async fn clear_store(&self) {
        let mut guard = self.store.write().await;
        guard.take();
    }

    /// Whether the application currently runs without storage.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.store.read().await;
        guard.is_none()
    }

    /// Slot holding the active puzzle session, if any.
    pub fn active(&self) -> &Mutex<Option<ActiveSession>> {
        &self.active
    }

    /// Static catalog of puzzle pages.
    pub fn catalog(&self) -> &PuzzleCatalog {
        &self.catalog
    }

    /// Static registry of accepted answer digests.
    pub fn registry(&self) -> &AnswerRegistry {
        &self.registry
    }

    /// Penalty window applied after a wrong guess, in seconds.
    pub fn penalty_seconds(&self) -> u32 {
        self.penalty_seconds
    }
}
