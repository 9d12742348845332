//! Multiplicathlon Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the quiz and
//! session contexts depend on. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod event;
pub mod rng;
pub mod storage;
