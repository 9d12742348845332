//! Shared application state.

use std::sync::{Arc, Mutex};

use multiplicathlon_core::clock::{Clock, SystemClock};
use multiplicathlon_core::rng::{DeterministicRng, StdDeterministicRng};
use multiplicathlon_core::storage::KeyValueStore;
use multiplicathlon_quiz::domain::catalog::ExamCatalog;

use crate::config::AppConfig;
use crate::store::JsonFileStore;

/// Collaborators shared by the controller and the event loop.
#[derive(Clone)]
pub struct AppState {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Random source for quiz generation.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Persistence for options and profiles.
    pub store: Arc<dyn KeyValueStore>,
    /// The exam presets offered to the learner.
    pub catalog: Arc<ExamCatalog>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        store: Arc<dyn KeyValueStore>,
        catalog: Arc<ExamCatalog>,
    ) -> Self {
        Self {
            clock,
            rng,
            store,
            catalog,
        }
    }

    /// Production state: system clock, seeded or OS-seeded RNG, JSON files
    /// under the configured directory, and the belt catalog.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdDeterministicRng::from_entropy, StdDeterministicRng::seeded);
        Self::new(
            Arc::new(SystemClock),
            Arc::new(Mutex::new(rng)),
            Arc::new(JsonFileStore::new(config.data_dir.clone())),
            Arc::new(ExamCatalog::belts()),
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("exams", &self.catalog.len())
            .finish_non_exhaustive()
    }
}
