//! Application layer for the Quiz Generation context.

pub mod command_handlers;
pub mod query_handlers;
