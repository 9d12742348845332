//! Multiplicathlon — Session & Progress bounded context.
//!
//! Responsible for playing a generated quiz (answers, countdown, end of
//! session), scoring it, and keeping each learner's best exam results.

pub mod application;
pub mod domain;
