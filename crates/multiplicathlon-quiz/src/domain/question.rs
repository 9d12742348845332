//! Question generator: correct answer plus distractor choices.

use std::fmt;

use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::rng::{DeterministicRng, random_int, random_int_in_range, shuffle};
use serde::{Deserialize, Serialize};

/// Hard cap on distractor sampling attempts per question.
pub const MAX_CHOICE_ATTEMPTS: usize = 100;

/// Arithmetic operation of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Multiplication,
    Division,
    Addition,
    Subtraction,
}

impl Operation {
    /// Applies the operation, returning `None` when the result is not an
    /// integer (inexact or by-zero division) or overflows.
    #[must_use]
    pub fn apply(self, lhs: i128, rhs: i128) -> Option<i128> {
        match self {
            Self::Multiplication => lhs.checked_mul(rhs),
            Self::Division => {
                if lhs.checked_rem(rhs)? != 0 {
                    return None;
                }
                lhs.checked_div(rhs)
            }
            Self::Addition => lhs.checked_add(rhs),
            Self::Subtraction => lhs.checked_sub(rhs),
        }
    }

    /// Symbol shown between the operands.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Multiplication => 'x',
            Self::Division => '/',
            Self::Addition => '+',
            Self::Subtraction => '-',
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multiplication => write!(f, "multiplication"),
            Self::Division => write!(f, "division"),
            Self::Addition => write!(f, "addition"),
            Self::Subtraction => write!(f, "subtraction"),
        }
    }
}

/// A single generated question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathQuestion {
    pub operation: Operation,
    pub operand1: u64,
    pub operand2: u64,
    pub correct_answer: u64,
    /// Empty unless the quiz is played with multiple choices.
    pub answer_choices: Vec<u64>,
}

impl MathQuestion {
    /// Whether `answer` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: u64) -> bool {
        self.correct_answer == answer
    }

    /// The question as displayed, e.g. `"6 x 7"`.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "{} {} {}",
            self.operand1,
            self.operation.symbol(),
            self.operand2
        )
    }
}

/// Builds a question for `operand1 <operation> operand2`.
///
/// With `desired_choices == 0` no choices are generated and no random draws
/// are made.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the operation does not yield a
/// non-negative integer for these operands.
pub fn generate_question(
    rng: &mut dyn DeterministicRng,
    operation: Operation,
    operand1: u64,
    operand2: u64,
    desired_choices: usize,
) -> Result<MathQuestion, DomainError> {
    let correct_answer = operation
        .apply(i128::from(operand1), i128::from(operand2))
        .and_then(|value| u64::try_from(value).ok())
        .ok_or_else(|| {
            DomainError::Validation(format!(
                "{operand1} {} {operand2} has no non-negative integer result",
                operation.symbol()
            ))
        })?;

    let answer_choices = if desired_choices == 0 {
        Vec::new()
    } else {
        generate_answer_choices(
            rng,
            operation,
            operand1,
            operand2,
            correct_answer,
            desired_choices,
        )
    };

    Ok(MathQuestion {
        operation,
        operand1,
        operand2,
        correct_answer,
        answer_choices,
    })
}

/// Returns up to `desired` distinct non-negative choices, `correct` among
/// them, in shuffled order.
///
/// Sampling stops after [`MAX_CHOICE_ATTEMPTS`], so the result may be shorter
/// than requested when operands are small.
pub fn generate_answer_choices(
    rng: &mut dyn DeterministicRng,
    operation: Operation,
    operand1: u64,
    operand2: u64,
    correct: u64,
    desired: usize,
) -> Vec<u64> {
    let mut choices = vec![correct];
    for _ in 0..MAX_CHOICE_ATTEMPTS {
        if choices.len() >= desired {
            break;
        }
        let candidate = if random_int(rng, 2) == 0 {
            i128::from(correct).checked_add(i128::from(random_int_in_range(rng, -3, 4)))
        } else {
            let lhs = i128::from(operand1) + i128::from(random_int_in_range(rng, -2, 3));
            let rhs = i128::from(operand2) + i128::from(random_int_in_range(rng, -2, 3));
            operation.apply(lhs, rhs)
        };
        if let Some(value) = candidate.and_then(|c| u64::try_from(c).ok())
            && !choices.contains(&value)
        {
            choices.push(value);
        }
    }
    shuffle(rng, &mut choices);
    choices
}
