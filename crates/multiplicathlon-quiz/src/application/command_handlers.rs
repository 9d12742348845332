//! Command handlers for the Quiz Generation context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: validate options, draw from the RNG, persist.

use std::sync::Mutex;

use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::event::Command;
use multiplicathlon_core::rng::DeterministicRng;
use multiplicathlon_core::storage::{KeyValueStore, OPTIONS_KEY, save_json};
use tracing::{info, instrument};

use crate::domain::commands::{GenerateQuiz, UpdateGameOptions};
use crate::domain::quiz::{Quiz, generate_quiz};

/// Handles the `GenerateQuiz` command: validates the options and generates
/// every question up front.
///
/// The `Mutex` is locked only for the duration of the synchronous generation.
///
/// # Errors
///
/// Returns `DomainError::Configuration` if the options are unusable, or
/// `DomainError::Infrastructure` if the RNG mutex is poisoned.
#[instrument(skip(command, rng), fields(quiz_id = %command.quiz_id))]
pub fn handle_generate_quiz(
    command: &GenerateQuiz,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<Quiz, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling generate_quiz command"
    );
    let quiz = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        generate_quiz(&mut *rng_guard, command.quiz_id.clone(), &command.options)?
    };
    info!(questions = quiz.len(), "quiz generated");
    Ok(quiz)
}

/// Handles the `UpdateGameOptions` command: validates the options and saves
/// them under the options key.
///
/// # Errors
///
/// Returns `DomainError::Configuration` if the options are invalid (nothing
/// is saved), or `DomainError::Infrastructure` if the store fails.
#[instrument(skip(command, store))]
pub async fn handle_update_game_options(
    command: &UpdateGameOptions,
    store: &dyn KeyValueStore,
) -> Result<(), DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling update_game_options command"
    );
    command.options.validate()?;
    save_json(store, OPTIONS_KEY, &command.options).await
}
