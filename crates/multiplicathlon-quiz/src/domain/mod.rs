//! Domain layer for the Quiz Generation context.

pub mod catalog;
pub mod commands;
pub mod options;
pub mod question;
pub mod quiz;
