//! Quiz generator: materializes every question of a game up front.

use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::rng::{DeterministicRng, pick, random_int_in_range};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::options::{DivisionOptions, GameOptions, MultiplicationOptions, OperationConfig};
use super::question::{MathQuestion, Operation, generate_question};

/// A generated quiz. The question list is fixed for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Exam or mode identifier; empty for an untracked game.
    pub id: String,
    /// Options the questions were generated from.
    pub options: GameOptions,
    pub questions: Vec<MathQuestion>,
}

impl Quiz {
    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the quiz has no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question at `index`, if any.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&MathQuestion> {
        self.questions.get(index)
    }
}

fn draw_table(rng: &mut dyn DeterministicRng, tables: &[u32], operation: Operation) -> u64 {
    if let Some(table) = pick(rng, tables) {
        u64::from(*table)
    } else {
        warn!(%operation, "no table configured, falling back to 0");
        0
    }
}

/// Draws `(operand1, operand2)` for a multiplication question.
///
/// In table mode `operand1` comes from the tables and `operand2` from
/// `[2, max)` (or `[0, max)` when 0 and 1 are allowed). Otherwise both come
/// from `[min, max)`.
pub fn generate_operands_for_multiplication(
    rng: &mut dyn DeterministicRng,
    options: &MultiplicationOptions,
) -> (u64, u64) {
    let max = i64::from(options.max_number);
    if options.use_tables {
        let tables: Vec<u32> = options.tables.iter().copied().collect();
        let operand1 = draw_table(rng, &tables, Operation::Multiplication);
        let start = if options.exclude_zero_and_one { 2 } else { 0 };
        let operand2 = random_int_in_range(rng, start, max).unsigned_abs();
        (operand1, operand2)
    } else {
        let min = i64::from(options.min_number);
        let operand1 = random_int_in_range(rng, min, max).unsigned_abs();
        let operand2 = random_int_in_range(rng, min, max).unsigned_abs();
        (operand1, operand2)
    }
}

/// Draws `(dividend, divisor)` for a division question.
///
/// The divisor comes from `[2, max)` (or `[1, max)` when 1 is allowed) and
/// the quotient from the tables, so the division is always exact.
pub fn generate_operands_for_division(
    rng: &mut dyn DeterministicRng,
    options: &DivisionOptions,
) -> (u64, u64) {
    let start = if options.exclude_one { 2 } else { 1 };
    let divisor = random_int_in_range(rng, start, i64::from(options.max_number)).unsigned_abs();
    let tables: Vec<u32> = options.tables.iter().copied().collect();
    let quotient = draw_table(rng, &tables, Operation::Division);
    (quotient * divisor, divisor)
}

/// Generates `options.quiz.question_count` questions.
///
/// Each question independently picks one of the enabled operations.
///
/// # Errors
///
/// Returns `DomainError::Configuration` if the options fail validation,
/// including when no operation is enabled.
pub fn generate_quiz(
    rng: &mut dyn DeterministicRng,
    id: impl Into<String>,
    options: &GameOptions,
) -> Result<Quiz, DomainError> {
    options.validate()?;

    let desired_choices = if options.quiz.multiple_choices {
        options.quiz.choice_count as usize
    } else {
        0
    };

    let mut questions = Vec::with_capacity(options.quiz.question_count as usize);
    for _ in 0..options.quiz.question_count {
        let config = pick(rng, &options.operations).ok_or_else(|| {
            DomainError::Configuration("no operation enabled".to_owned())
        })?;
        let (operand1, operand2) = match config {
            OperationConfig::Multiplication(m) => generate_operands_for_multiplication(rng, m),
            OperationConfig::Division(d) => generate_operands_for_division(rng, d),
        };
        questions.push(generate_question(
            rng,
            config.operation(),
            operand1,
            operand2,
            desired_choices,
        )?);
    }

    Ok(Quiz {
        id: id.into(),
        options: options.clone(),
        questions,
    })
}
