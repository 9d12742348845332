//! Commands for the Session & Progress context.

use multiplicathlon_core::event::Command;
use uuid::Uuid;

use super::profile::ExamResult;

/// Command to create a learner profile.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Name of the new profile.
    pub name: String,
}

impl Command for CreateProfile {
    fn command_type(&self) -> &'static str {
        "session.create_profile"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to make a profile the active one.
#[derive(Debug, Clone)]
pub struct SwitchProfile {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Name of the profile to activate.
    pub name: String,
}

impl Command for SwitchProfile {
    fn command_type(&self) -> &'static str {
        "session.switch_profile"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to merge a finished session's result into the active profile.
#[derive(Debug, Clone)]
pub struct RecordExamResult {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The result, `None` for an abandoned session.
    pub result: Option<ExamResult>,
}

impl Command for RecordExamResult {
    fn command_type(&self) -> &'static str {
        "session.record_exam_result"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
