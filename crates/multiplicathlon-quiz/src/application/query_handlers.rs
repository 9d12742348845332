//! Query handlers for the Quiz Generation context.
//!
//! This module contains query handlers that read stored options or the exam
//! catalog and return read-only view DTOs.

use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::storage::{KeyValueStore, OPTIONS_KEY, load_or_else};
use serde::Serialize;

use crate::domain::catalog::{ExamCatalog, ExamDefinition};
use crate::domain::options::{GameOptions, OperationConfig};
use crate::domain::question::Operation;

/// Read-only view of an exam for the mode-selection screen.
#[derive(Debug, Serialize)]
pub struct ExamView {
    /// The exam identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// One-line description.
    pub description: String,
    /// Icon reference.
    pub icon: String,
    /// Operations the exam asks about.
    pub operations: Vec<Operation>,
    /// Number of questions.
    pub question_count: u32,
    /// Score that must be exceeded to pass.
    pub pass_threshold: u32,
}

impl From<&ExamDefinition> for ExamView {
    fn from(exam: &ExamDefinition) -> Self {
        Self {
            id: exam.id.clone(),
            label: exam.label.clone(),
            description: exam.description.clone(),
            icon: exam.icon.clone(),
            operations: exam
                .options
                .operations
                .iter()
                .map(OperationConfig::operation)
                .collect(),
            question_count: exam.options.quiz.question_count,
            pass_threshold: exam.options.quiz.pass_threshold,
        }
    }
}

/// Loads the learner's saved options, or the defaults when none are stored
/// or the stored blob does not decode.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn load_game_options(store: &dyn KeyValueStore) -> Result<GameOptions, DomainError> {
    load_or_else(store, OPTIONS_KEY, GameOptions::default).await
}

/// Lists the catalog's exams in order.
#[must_use]
pub fn list_exams(catalog: &ExamCatalog) -> Vec<ExamView> {
    catalog.iter().map(ExamView::from).collect()
}

#[cfg(test)]
mod tests {
    use multiplicathlon_test_support::{FailingStore, InMemoryStore};

    use super::*;

    #[tokio::test]
    async fn test_load_game_options_defaults_when_absent() {
        let store = InMemoryStore::new();
        let options = load_game_options(&store).await.unwrap();
        assert_eq!(options, GameOptions::default());
    }

    #[tokio::test]
    async fn test_load_game_options_defaults_when_malformed() {
        let store = InMemoryStore::with_value("options", serde_json::json!({"quiz": 12}));
        let options = load_game_options(&store).await.unwrap();
        assert_eq!(options, GameOptions::default());
    }

    #[tokio::test]
    async fn test_load_game_options_returns_stored_value() {
        let stored = GameOptions::belt(None, Some(&[3, 4]));
        let store = InMemoryStore::with_value("options", serde_json::to_value(&stored).unwrap());
        let options = load_game_options(&store).await.unwrap();
        assert_eq!(options, stored);
    }

    #[tokio::test]
    async fn test_load_game_options_propagates_store_failure() {
        let result = load_game_options(&FailingStore).await;
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[test]
    fn test_list_exams_exposes_operations() {
        let views = list_exams(&ExamCatalog::belts());
        assert_eq!(views.len(), 10);
        assert_eq!(views[0].operations, vec![Operation::Multiplication]);
        assert_eq!(views[7].operations, vec![Operation::Division]);
        assert_eq!(
            views[9].operations,
            vec![Operation::Multiplication, Operation::Division]
        );
        assert_eq!(views[0].description, "Tables du 2 et du 3!");
    }
}
