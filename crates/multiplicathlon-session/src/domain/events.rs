//! Domain events for the Session & Progress context.

use chrono::{DateTime, Utc};
use multiplicathlon_core::event::{DomainEvent, EventMetadata};
use multiplicathlon_quiz::domain::options::GameMode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every question was answered.
    QuestionsExhausted,
    /// A wrong answer in sudden-death mode.
    WrongAnswer,
    /// The countdown reached zero.
    TimeExpired,
    /// The player quit; no result is recorded.
    Abandoned,
}

/// Emitted when a session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    /// The session identifier.
    pub session_id: Uuid,
    /// Exam or mode identifier of the quiz.
    pub quiz_id: String,
    /// The game mode.
    pub mode: GameMode,
    /// Number of questions in the quiz.
    pub question_count: usize,
    /// Countdown deadline, only in time-limit mode.
    pub deadline: Option<DateTime<Utc>>,
}

/// Emitted when an answer is submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSubmitted {
    /// The session identifier.
    pub session_id: Uuid,
    /// Index of the answered question.
    pub question_index: usize,
    /// The submitted value.
    pub answer: u64,
    /// Whether it was correct.
    pub correct: bool,
    /// Index of the question shown next.
    pub next_index: usize,
}

/// Emitted when a session ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnded {
    /// The session identifier.
    pub session_id: Uuid,
    /// Why the session ended.
    pub reason: EndReason,
    /// Correct answers at the end.
    pub score: u32,
    /// Wrong answers at the end.
    pub wrong_answers: u32,
}

/// Event type identifier for [`SessionStarted`].
pub const SESSION_STARTED_EVENT_TYPE: &str = "session.started";

/// Event type identifier for [`AnswerSubmitted`].
pub const ANSWER_SUBMITTED_EVENT_TYPE: &str = "session.answer_submitted";

/// Event type identifier for [`SessionEnded`].
pub const SESSION_ENDED_EVENT_TYPE: &str = "session.ended";

/// Event payload variants for the Session & Progress context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A session has started.
    SessionStarted(SessionStarted),
    /// An answer has been submitted.
    AnswerSubmitted(AnswerSubmitted),
    /// A session has ended.
    SessionEnded(SessionEnded),
}

impl SessionEventKind {
    /// The event type string for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => SESSION_STARTED_EVENT_TYPE,
            Self::AnswerSubmitted(_) => ANSWER_SUBMITTED_EVENT_TYPE,
            Self::SessionEnded(_) => SESSION_ENDED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Session & Progress context.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_payload_is_tagged_by_variant() {
        let session_id = Uuid::new_v4();
        let event = SessionEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: SESSION_ENDED_EVENT_TYPE.to_owned(),
                aggregate_id: session_id,
                sequence_number: 3,
                correlation_id: Uuid::new_v4(),
                occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            },
            kind: SessionEventKind::SessionEnded(SessionEnded {
                session_id,
                reason: EndReason::WrongAnswer,
                score: 4,
                wrong_answers: 1,
            }),
        };

        assert_eq!(event.event_type(), "session.ended");
        let payload = event.to_payload();
        assert_eq!(payload["SessionEnded"]["reason"], "wrong_answer");
        assert_eq!(payload["SessionEnded"]["score"], 4);
    }
}
