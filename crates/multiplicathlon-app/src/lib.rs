//! Multiplicathlon — application shell.
//!
//! Wires the core to its collaborators: configuration from the environment,
//! tracing, a JSON file store, and the controller/event loop that the
//! rendering layer talks to.

pub mod config;
pub mod controller;
pub mod error;
pub mod event_loop;
pub mod state;
pub mod store;
pub mod telemetry;
