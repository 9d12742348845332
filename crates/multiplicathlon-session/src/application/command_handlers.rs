//! Command handlers for the Session & Progress context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load the profile list, apply the command, save.

use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::event::Command;
use multiplicathlon_core::storage::{KeyValueStore, PROFILES_KEY, save_json};
use tracing::{debug, info, instrument};

use crate::application::query_handlers::load_profiles;
use crate::domain::commands::{CreateProfile, RecordExamResult, SwitchProfile};
use crate::domain::profile::ProfileList;

/// Handles the `CreateProfile` command: adds an inactive profile and saves
/// the list.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is empty or taken, or
/// `DomainError::Infrastructure` if the store fails.
#[instrument(skip(command, store), fields(profile = %command.name))]
pub async fn handle_create_profile(
    command: &CreateProfile,
    store: &dyn KeyValueStore,
) -> Result<ProfileList, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling create_profile command"
    );
    let mut profiles = load_profiles(store).await?;
    profiles.add_profile(&command.name)?;
    save_json(store, PROFILES_KEY, &profiles).await?;
    Ok(profiles)
}

/// Handles the `SwitchProfile` command: activates the named profile and
/// deactivates every other one.
///
/// # Errors
///
/// Returns `DomainError::ProfileNotFound` if the name is unknown, or
/// `DomainError::Infrastructure` if the store fails.
#[instrument(skip(command, store), fields(profile = %command.name))]
pub async fn handle_switch_profile(
    command: &SwitchProfile,
    store: &dyn KeyValueStore,
) -> Result<ProfileList, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling switch_profile command"
    );
    let mut profiles = load_profiles(store).await?;
    profiles.switch_active(&command.name)?;
    save_json(store, PROFILES_KEY, &profiles).await?;
    Ok(profiles)
}

/// Handles the `RecordExamResult` command: merges the result into the active
/// profile and saves the list. An absent result changes and saves nothing.
///
/// # Errors
///
/// Returns `DomainError::ProfileNotFound` if no profile is active, or
/// `DomainError::Infrastructure` if the store fails.
#[instrument(skip(command, store))]
pub async fn handle_record_exam_result(
    command: &RecordExamResult,
    store: &dyn KeyValueStore,
) -> Result<ProfileList, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        "handling record_exam_result command"
    );
    let profiles = load_profiles(store).await?;
    let Some(result) = command.result.as_ref() else {
        debug!("no result to record");
        return Ok(profiles);
    };
    let profiles = profiles.record_result(Some(result))?;
    save_json(store, PROFILES_KEY, &profiles).await?;
    info!(exam_id = %result.id, score = result.score, passed = result.passed, "exam result recorded");
    Ok(profiles)
}
