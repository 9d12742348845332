//! Options model: which operations are enabled and over which numbers.
//!
//! Enabled operations are a list of tagged configurations rather than a pair
//! of nullable fields, so "multiplication only", "division only" and "both"
//! are all the same shape. An empty list is still representable (it can come
//! back from storage) and is rejected by [`GameOptions::validate`].

use std::collections::BTreeSet;

use multiplicathlon_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::question::Operation;

/// How a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Ends when the countdown reaches zero.
    TimeLimit,
    /// Ends on the first wrong answer.
    SuddenDeath,
    /// Ends only when the questions run out or the player quits.
    Endless,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimeLimit => write!(f, "time_limit"),
            Self::SuddenDeath => write!(f, "sudden_death"),
            Self::Endless => write!(f, "endless"),
        }
    }
}

/// Session-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizOptions {
    /// Game mode.
    pub mode: GameMode,
    /// Countdown length in minutes (only used in `TimeLimit` mode).
    pub time_limit_minutes: u32,
    /// Whether answers are picked from a list of choices.
    pub multiple_choices: bool,
    /// Number of questions generated up front.
    pub question_count: u32,
    /// A score strictly greater than this passes.
    pub pass_threshold: u32,
    /// Requested number of answer choices (correct answer included).
    pub choice_count: u32,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            mode: GameMode::TimeLimit,
            time_limit_minutes: 1,
            multiple_choices: false,
            question_count: 20,
            pass_threshold: 18,
            choice_count: 6,
        }
    }
}

impl QuizOptions {
    /// Sets the countdown length.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `minutes` is zero.
    pub fn set_time_limit(&mut self, minutes: u32) -> Result<(), DomainError> {
        if minutes == 0 {
            return Err(DomainError::Validation(
                "time limit must be at least one minute".to_owned(),
            ));
        }
        self.time_limit_minutes = minutes;
        Ok(())
    }

    /// Countdown length in seconds.
    #[must_use]
    pub fn time_limit_seconds(&self) -> i64 {
        i64::from(self.time_limit_minutes) * 60
    }
}

/// Multiplication settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplicationOptions {
    /// Lower bound (inclusive) for free-range operands.
    pub min_number: u32,
    /// Upper bound (exclusive) for operands.
    pub max_number: u32,
    /// Whether the first operand is drawn from `tables`.
    pub use_tables: bool,
    /// Whitelist of first operands when `use_tables` is on.
    pub tables: BTreeSet<u32>,
    /// Whether the second operand skips 0 and 1 in table mode.
    pub exclude_zero_and_one: bool,
}

impl Default for MultiplicationOptions {
    fn default() -> Self {
        Self {
            min_number: 2,
            max_number: 10,
            use_tables: true,
            tables: BTreeSet::from([2, 3, 5, 10]),
            exclude_zero_and_one: true,
        }
    }
}

impl MultiplicationOptions {
    /// Options restricted to the given tables, other fields default.
    #[must_use]
    pub fn with_tables(tables: &[u32]) -> Self {
        Self {
            tables: tables.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Adds or removes one table.
    pub fn toggle_table(&mut self, table: u32, enabled: bool) {
        if enabled {
            self.tables.insert(table);
        } else {
            self.tables.remove(&table);
        }
    }

    /// Sets the free-range bounds, swapping them if given in reverse.
    pub fn set_bounds(&mut self, min: u32, max: u32) {
        self.min_number = min.min(max);
        self.max_number = max.max(min);
    }
}

/// Division settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionOptions {
    /// Upper bound (exclusive) for the divisor.
    pub max_number: u32,
    /// Candidate quotients.
    pub tables: BTreeSet<u32>,
    /// Whether the divisor skips 1.
    pub exclude_one: bool,
}

impl Default for DivisionOptions {
    fn default() -> Self {
        Self {
            max_number: 10,
            tables: BTreeSet::from([2, 3, 5, 10]),
            exclude_one: true,
        }
    }
}

impl DivisionOptions {
    /// Options restricted to the given tables, other fields default.
    #[must_use]
    pub fn with_tables(tables: &[u32]) -> Self {
        Self {
            tables: tables.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Adds or removes one table.
    pub fn toggle_table(&mut self, table: u32, enabled: bool) {
        if enabled {
            self.tables.insert(table);
        } else {
            self.tables.remove(&table);
        }
    }
}

/// One enabled operation together with its settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum OperationConfig {
    /// Multiplication questions.
    Multiplication(MultiplicationOptions),
    /// Division questions.
    Division(DivisionOptions),
}

impl OperationConfig {
    /// The operation this configuration generates.
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::Multiplication(_) => Operation::Multiplication,
            Self::Division(_) => Operation::Division,
        }
    }
}

/// Full configuration of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Session-level settings.
    pub quiz: QuizOptions,
    /// Enabled operations; questions pick among them uniformly.
    pub operations: Vec<OperationConfig>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            quiz: QuizOptions::default(),
            operations: vec![
                OperationConfig::Multiplication(MultiplicationOptions::default()),
                OperationConfig::Division(DivisionOptions::default()),
            ],
        }
    }
}

impl GameOptions {
    /// Builds belt-style options: default quiz settings and only the
    /// operations whose tables are given.
    #[must_use]
    pub fn belt(multiplication_tables: Option<&[u32]>, division_tables: Option<&[u32]>) -> Self {
        let mut operations = Vec::new();
        if let Some(tables) = multiplication_tables {
            operations.push(OperationConfig::Multiplication(
                MultiplicationOptions::with_tables(tables),
            ));
        }
        if let Some(tables) = division_tables {
            operations.push(OperationConfig::Division(DivisionOptions::with_tables(
                tables,
            )));
        }
        Self {
            quiz: QuizOptions::default(),
            operations,
        }
    }

    /// Multiplication settings, if multiplication is enabled.
    #[must_use]
    pub fn multiplication(&self) -> Option<&MultiplicationOptions> {
        self.operations.iter().find_map(|op| match op {
            OperationConfig::Multiplication(m) => Some(m),
            OperationConfig::Division(_) => None,
        })
    }

    /// Mutable multiplication settings, if multiplication is enabled.
    pub fn multiplication_mut(&mut self) -> Option<&mut MultiplicationOptions> {
        self.operations.iter_mut().find_map(|op| match op {
            OperationConfig::Multiplication(m) => Some(m),
            OperationConfig::Division(_) => None,
        })
    }

    /// Division settings, if division is enabled.
    #[must_use]
    pub fn division(&self) -> Option<&DivisionOptions> {
        self.operations.iter().find_map(|op| match op {
            OperationConfig::Division(d) => Some(d),
            OperationConfig::Multiplication(_) => None,
        })
    }

    /// Mutable division settings, if division is enabled.
    pub fn division_mut(&mut self) -> Option<&mut DivisionOptions> {
        self.operations.iter_mut().find_map(|op| match op {
            OperationConfig::Division(d) => Some(d),
            OperationConfig::Multiplication(_) => None,
        })
    }

    /// Enables an operation with default settings, or disables it.
    ///
    /// Enabling an operation that is already enabled keeps its settings.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for operations the generator does
    /// not support.
    pub fn set_operation_enabled(
        &mut self,
        operation: Operation,
        enabled: bool,
    ) -> Result<(), DomainError> {
        let config = match operation {
            Operation::Multiplication => {
                OperationConfig::Multiplication(MultiplicationOptions::default())
            }
            Operation::Division => OperationConfig::Division(DivisionOptions::default()),
            Operation::Addition | Operation::Subtraction => {
                return Err(DomainError::Validation(format!(
                    "{operation} questions are not supported"
                )));
            }
        };
        let present = self.operations.iter().any(|op| op.operation() == operation);
        if enabled && !present {
            self.operations.push(config);
        } else if !enabled {
            self.operations.retain(|op| op.operation() != operation);
        }
        Ok(())
    }

    /// Checks that these options can generate a quiz.
    ///
    /// Inverted numeric ranges are not rejected here; the sampler clamps them.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` describing the first problem found.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.operations.is_empty() {
            return Err(DomainError::Configuration(
                "no operation enabled: enable multiplication or division".to_owned(),
            ));
        }
        let mut seen = Vec::with_capacity(self.operations.len());
        for config in &self.operations {
            let operation = config.operation();
            if seen.contains(&operation) {
                return Err(DomainError::Configuration(format!(
                    "{operation} is configured more than once"
                )));
            }
            seen.push(operation);
            match config {
                OperationConfig::Multiplication(m) if m.use_tables && m.tables.is_empty() => {
                    return Err(DomainError::Configuration(
                        "multiplication tables must not be empty".to_owned(),
                    ));
                }
                OperationConfig::Division(d) if d.tables.is_empty() => {
                    return Err(DomainError::Configuration(
                        "division tables must not be empty".to_owned(),
                    ));
                }
                _ => {}
            }
        }
        if self.quiz.question_count == 0 {
            return Err(DomainError::Configuration(
                "question count must be positive".to_owned(),
            ));
        }
        if self.quiz.mode == GameMode::TimeLimit && self.quiz.time_limit_minutes == 0 {
            return Err(DomainError::Configuration(
                "time limit must be positive".to_owned(),
            ));
        }
        if self.quiz.multiple_choices && self.quiz.choice_count == 0 {
            return Err(DomainError::Configuration(
                "choice count must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}
