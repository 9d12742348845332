//! Domain layer for the Session & Progress context.

pub mod aggregates;
pub mod commands;
pub mod countdown;
pub mod events;
pub mod profile;
