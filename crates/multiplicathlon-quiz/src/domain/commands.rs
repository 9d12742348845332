//! Commands for the Quiz Generation context.

use multiplicathlon_core::event::Command;
use uuid::Uuid;

use super::options::GameOptions;

/// Command to generate a quiz from a set of options.
#[derive(Debug, Clone)]
pub struct GenerateQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Exam or mode identifier carried into the quiz.
    pub quiz_id: String,
    /// Options to generate from.
    pub options: GameOptions,
}

impl Command for GenerateQuiz {
    fn command_type(&self) -> &'static str {
        "quiz.generate_quiz"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace the learner's saved game options.
#[derive(Debug, Clone)]
pub struct UpdateGameOptions {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The new options.
    pub options: GameOptions,
}

impl Command for UpdateGameOptions {
    fn command_type(&self) -> &'static str {
        "quiz.update_game_options"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
