//! Multiplicathlon — Quiz Generation bounded context.
//!
//! Responsible for game options, the belt catalog, and turning options into
//! a fully materialized list of arithmetic questions.

pub mod application;
pub mod domain;
