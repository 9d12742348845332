//! Query handlers for the Session & Progress context.
//!
//! This module contains query handlers that read the stored profile list
//! and return read-only view DTOs.

use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::storage::{KeyValueStore, PROFILES_KEY, load_or_else};
use multiplicathlon_quiz::domain::catalog::ExamCatalog;
use serde::Serialize;

use crate::domain::profile::{Profile, ProfileList};

/// Read-only view of a profile for the profile picker.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    /// The profile name.
    pub name: String,
    /// Whether this is the active profile.
    pub active: bool,
    /// Number of exams passed at least once.
    pub exams_passed: usize,
}

/// Read-only view of one belt's progress for a profile.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BeltProgressView {
    /// The exam identifier.
    pub exam_id: String,
    /// Display label.
    pub label: String,
    /// Whether the exam was ever passed.
    pub passed: bool,
    /// Best percentage, if the exam was ever taken.
    pub best_score: Option<u32>,
}

/// Loads the stored profile list, empty when none is stored or the stored
/// blob does not decode.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn load_profiles(store: &dyn KeyValueStore) -> Result<ProfileList, DomainError> {
    load_or_else(store, PROFILES_KEY, ProfileList::default).await
}

/// Lists the stored profiles.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn list_profiles(store: &dyn KeyValueStore) -> Result<Vec<ProfileView>, DomainError> {
    let profiles = load_profiles(store).await?;
    Ok(profiles
        .iter()
        .map(|p| ProfileView {
            name: p.name.clone(),
            active: p.active,
            exams_passed: p.stats.exams.iter().filter(|e| e.passed).count(),
        })
        .collect())
}

/// Progress of `profile` on every exam of `catalog`, in catalog order.
#[must_use]
pub fn belt_progress(profile: &Profile, catalog: &ExamCatalog) -> Vec<BeltProgressView> {
    catalog
        .iter()
        .map(|exam| {
            let record = profile.exam(&exam.id);
            BeltProgressView {
                exam_id: exam.id.clone(),
                label: exam.label.clone(),
                passed: record.is_some_and(|r| r.passed),
                best_score: record.map(|r| r.score),
            }
        })
        .collect()
}

/// Progress of the active profile on every exam of `catalog`.
///
/// # Errors
///
/// Returns `DomainError::ProfileNotFound` if no profile is active, or
/// `DomainError::Infrastructure` if the store fails.
pub async fn active_profile_progress(
    store: &dyn KeyValueStore,
    catalog: &ExamCatalog,
) -> Result<Vec<BeltProgressView>, DomainError> {
    let profiles = load_profiles(store).await?;
    let active = profiles
        .active()
        .ok_or_else(|| DomainError::ProfileNotFound("no active profile".to_owned()))?;
    Ok(belt_progress(active, catalog))
}

#[cfg(test)]
mod tests {
    use multiplicathlon_core::error::DomainError;
    use multiplicathlon_quiz::domain::catalog::ExamCatalog;
    use multiplicathlon_test_support::{FailingStore, InMemoryStore};

    use crate::application::query_handlers::{
        active_profile_progress, list_profiles, load_profiles,
    };

    fn seeded_store() -> InMemoryStore {
        InMemoryStore::with_value(
            "profiles",
            serde_json::json!([
                { "name": "Alice", "active": false },
                {
                    "name": "Bob",
                    "active": true,
                    "stats": { "exams": [
                        { "id": "BELT_1", "score": 95, "passed": true },
                        { "id": "BELT_2", "score": 60, "passed": false }
                    ] }
                }
            ]),
        )
    }

    #[tokio::test]
    async fn test_load_profiles_empty_when_absent_or_malformed() {
        assert!(load_profiles(&InMemoryStore::new()).await.unwrap().is_empty());
        let malformed = InMemoryStore::with_value("profiles", serde_json::json!({"name": 3}));
        assert!(load_profiles(&malformed).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_profiles_counts_passed_exams() {
        let views = list_profiles(&seeded_store()).await.unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "Alice");
        assert_eq!(views[0].exams_passed, 0);
        assert!(views[1].active);
        assert_eq!(views[1].exams_passed, 1);
    }

    #[tokio::test]
    async fn test_active_profile_progress_covers_whole_catalog() {
        let progress = active_profile_progress(&seeded_store(), &ExamCatalog::belts())
            .await
            .unwrap();

        assert_eq!(progress.len(), 10);
        assert!(progress[0].passed);
        assert_eq!(progress[0].best_score, Some(95));
        assert!(!progress[1].passed);
        assert_eq!(progress[1].best_score, Some(60));
        assert_eq!(progress[2].best_score, None);
        assert_eq!(progress[9].label, "Ceinture noire");
    }

    #[tokio::test]
    async fn test_active_profile_progress_without_active_profile_fails() {
        let result = active_profile_progress(&InMemoryStore::new(), &ExamCatalog::belts()).await;
        assert!(matches!(result, Err(DomainError::ProfileNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_profiles_propagates_store_failure() {
        let result = list_profiles(&FailingStore).await;
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
