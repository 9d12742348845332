//! Shared test helpers for application integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use multiplicathlon_app::controller::{GameController, UiEvent, ViewUpdate};
use multiplicathlon_app::state::AppState;
use multiplicathlon_core::clock::Clock;
use multiplicathlon_core::rng::{DeterministicRng, StdDeterministicRng};
use multiplicathlon_core::storage::KeyValueStore;
use multiplicathlon_quiz::domain::catalog::ExamCatalog;
use multiplicathlon_session::domain::aggregates::SessionSnapshot;
use multiplicathlon_test_support::{InMemoryStore, ManualClock};

/// Clock starting at the fixed timestamp used across all tests.
pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build application state around the given clock and store with a seeded
/// RNG and the belt catalog.
pub fn build_state(clock: Arc<ManualClock>, store: Arc<dyn KeyValueStore>) -> AppState {
    let clock: Arc<dyn Clock> = clock;
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(StdDeterministicRng::seeded(2026)));
    AppState::new(clock, rng, store, Arc::new(ExamCatalog::belts()))
}

/// Controller over an in-memory store.
pub fn build_controller(clock: Arc<ManualClock>) -> (GameController, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let controller = GameController::new(build_state(clock, store.clone()));
    (controller, store)
}

/// Create a profile and make it active.
pub async fn activate_profile(controller: &mut GameController, name: &str) {
    controller
        .handle(UiEvent::ProfileCreated(name.to_owned()))
        .await
        .unwrap();
    controller
        .handle(UiEvent::ProfileSwitched(name.to_owned()))
        .await
        .unwrap();
}

/// The correct answer to the question currently shown.
pub fn current_answer(controller: &GameController) -> u64 {
    controller
        .session()
        .and_then(|s| s.current_question())
        .map(|q| q.correct_answer)
        .expect("a question should be showing")
}

/// The snapshot carried by a `SessionEnded` update, if present.
pub fn ended_snapshot(updates: &[ViewUpdate]) -> Option<&SessionSnapshot> {
    updates.iter().find_map(|u| match u {
        ViewUpdate::SessionEnded { snapshot, .. } => Some(snapshot),
        _ => None,
    })
}
