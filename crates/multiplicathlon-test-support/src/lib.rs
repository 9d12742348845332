//! Shared test doubles for the Multiplicathlon crates.

mod clock;
mod rng;
mod store;

pub use clock::{FixedClock, ManualClock};
pub use rng::{MockRng, SequenceRng};
pub use store::{FailingStore, InMemoryStore};
