//! Exam catalog: the fixed list of graded "belt" presets and the free-play
//! modes offered next to them.
//!
//! The catalog is an ordinary value built at startup and handed to whoever
//! needs it; nothing here is global.

use multiplicathlon_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::options::{GameMode, GameOptions};

/// Identifier of the free-play sudden-death mode.
pub const SUDDEN_DEATH_MODE_ID: &str = "suddenDeath";

/// Identifier of the free-play time-limit mode.
pub const TIME_LIMIT_MODE_ID: &str = "timeLimit";

const BELT_ICON: &str = "belt.svg";

/// One named preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDefinition {
    pub id: String,
    pub label: String,
    pub description: String,
    pub icon: String,
    pub options: GameOptions,
}

impl ExamDefinition {
    fn belt(
        id: &str,
        label: &str,
        description: &str,
        multiplication_tables: Option<&[u32]>,
        division_tables: Option<&[u32]>,
    ) -> Self {
        Self {
            id: id.to_owned(),
            label: label.to_owned(),
            description: description.to_owned(),
            icon: BELT_ICON.to_owned(),
            options: GameOptions::belt(multiplication_tables, division_tables),
        }
    }
}

/// Ordered, immutable collection of exam presets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExamCatalog {
    exams: Vec<ExamDefinition>,
}

impl ExamCatalog {
    /// Builds a catalog from explicit definitions.
    #[must_use]
    pub fn new(exams: Vec<ExamDefinition>) -> Self {
        Self { exams }
    }

    /// The ten belts, from white (tables 2 and 3) to black (every table,
    /// both operations).
    #[must_use]
    pub fn belts() -> Self {
        const TWO_TO_TEN: &[u32] = &[2, 3, 4, 5, 6, 7, 8, 9, 10];
        Self::new(vec![
            ExamDefinition::belt(
                "BELT_1",
                "Ceinture blanche",
                "Tables du 2 et du 3!",
                Some(&[2, 3]),
                None,
            ),
            ExamDefinition::belt(
                "BELT_2",
                "Ceinture jaune",
                "Tables du 2, du 3, du 5 et du 10!",
                Some(&[2, 3, 5, 10]),
                None,
            ),
            ExamDefinition::belt(
                "BELT_3",
                "Ceinture orange",
                "Tables de 2 à 5 et de 10!",
                Some(&[2, 3, 4, 5, 10]),
                None,
            ),
            ExamDefinition::belt(
                "BELT_4",
                "Ceinture vert pâle",
                "Tables de 2 à 6 et de 10!",
                Some(&[2, 3, 4, 5, 6, 10]),
                None,
            ),
            ExamDefinition::belt(
                "BELT_5",
                "Ceinture vert forêt",
                "Tables de 2 à 7 et de 10!",
                Some(&[2, 3, 4, 5, 6, 7, 10]),
                None,
            ),
            ExamDefinition::belt(
                "BELT_6",
                "Ceinture bleu pâle",
                "Tables de 2 à 8 et de 10!",
                Some(&[2, 3, 4, 5, 6, 7, 8, 10]),
                None,
            ),
            ExamDefinition::belt(
                "BELT_7",
                "Ceinture bleu foncé",
                "Tables de 2 à 10!",
                Some(TWO_TO_TEN),
                None,
            ),
            ExamDefinition::belt(
                "BELT_8",
                "Ceinture rose",
                "Divisions jusqu'à 6!",
                None,
                Some(&[2, 3, 4, 5, 6]),
            ),
            ExamDefinition::belt(
                "BELT_9",
                "Ceinture rouge",
                "Divisions jusqu'à 10!",
                None,
                Some(TWO_TO_TEN),
            ),
            ExamDefinition::belt(
                "BELT_10",
                "Ceinture noire",
                "Toutes les opérations!",
                Some(TWO_TO_TEN),
                Some(TWO_TO_TEN),
            ),
        ])
    }

    /// Looks up an exam by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ExamDefinition> {
        self.exams.iter().find(|e| e.id == id)
    }

    /// Looks up an exam by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ExamNotFound` if no exam has this id.
    pub fn require(&self, id: &str) -> Result<&ExamDefinition, DomainError> {
        self.get(id)
            .ok_or_else(|| DomainError::ExamNotFound(id.to_owned()))
    }

    /// Exams in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ExamDefinition> {
        self.exams.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }
}

/// Free-play game: the learner's own options with the mode forced.
///
/// Returns the mode id used as the quiz id together with the options.
#[must_use]
pub fn free_play(base: &GameOptions, mode: GameMode) -> (String, GameOptions) {
    let mut options = base.clone();
    options.quiz.mode = mode;
    let id = match mode {
        GameMode::SuddenDeath => SUDDEN_DEATH_MODE_ID.to_owned(),
        GameMode::TimeLimit => TIME_LIMIT_MODE_ID.to_owned(),
        GameMode::Endless => String::new(),
    };
    (id, options)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_belts_are_ten_valid_presets_in_order() {
        let catalog = ExamCatalog::belts();
        assert_eq!(catalog.len(), 10);
        let ids: Vec<&str> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"BELT_1"));
        assert_eq!(ids.last(), Some(&"BELT_10"));
        for exam in catalog.iter() {
            assert!(exam.options.validate().is_ok(), "{} is invalid", exam.id);
            assert_eq!(exam.icon, "belt.svg");
            assert_eq!(exam.options.quiz.pass_threshold, 18);
        }
    }

    #[test]
    fn test_white_belt_is_tables_two_and_three() {
        let catalog = ExamCatalog::belts();
        let white = catalog.require("BELT_1").unwrap();
        assert_eq!(white.label, "Ceinture blanche");
        assert_eq!(
            white.options.multiplication().unwrap().tables,
            BTreeSet::from([2, 3])
        );
        assert!(white.options.division().is_none());
    }

    #[test]
    fn test_division_and_black_belts() {
        let catalog = ExamCatalog::belts();
        let pink = catalog.require("BELT_8").unwrap();
        assert!(pink.options.multiplication().is_none());
        assert_eq!(
            pink.options.division().unwrap().tables,
            BTreeSet::from([2, 3, 4, 5, 6])
        );
        let black = catalog.require("BELT_10").unwrap();
        assert!(black.options.multiplication().is_some());
        assert!(black.options.division().is_some());
    }

    #[test]
    fn test_require_unknown_exam_fails() {
        let catalog = ExamCatalog::belts();
        match catalog.require("BELT_11") {
            Err(DomainError::ExamNotFound(id)) => assert_eq!(id, "BELT_11"),
            other => panic!("expected ExamNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_free_play_forces_mode_and_id() {
        let base = GameOptions::default();
        let (id, options) = free_play(&base, GameMode::SuddenDeath);
        assert_eq!(id, "suddenDeath");
        assert_eq!(options.quiz.mode, GameMode::SuddenDeath);
        assert_eq!(options.operations, base.operations);

        let (id, _) = free_play(&base, GameMode::Endless);
        assert!(id.is_empty());
    }
}
