//! Aggregate roots for the Session & Progress context.

use multiplicathlon_core::aggregate::AggregateRoot;
use multiplicathlon_core::clock::Clock;
use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::event::EventMetadata;
use multiplicathlon_quiz::domain::options::GameMode;
use multiplicathlon_quiz::domain::question::MathQuestion;
use multiplicathlon_quiz::domain::quiz::Quiz;
use serde::Serialize;
use uuid::Uuid;

use super::countdown::Countdown;
use super::events::{
    AnswerSubmitted, EndReason, SessionEnded, SessionEvent, SessionEventKind, SessionStarted,
};
use super::profile::{ExamResult, score_percent};

/// Session phase state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionPhase {
    Created,
    InProgress,
    Ended(EndReason),
}

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was right.
    Correct,
    /// The answer was wrong.
    Wrong {
        /// The expected answer.
        correct_answer: u64,
    },
    /// The countdown had already run out; the answer was not counted.
    TooLate,
}

/// Read-only state for the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub quiz_id: String,
    pub mode: GameMode,
    /// The question to display; `None` once the session has ended.
    pub current_question: Option<MathQuestion>,
    pub question_index: usize,
    pub question_count: usize,
    pub score: u32,
    pub wrong_answers: u32,
    /// Whether the session has ended.
    pub ended: bool,
    pub end_reason: Option<EndReason>,
    /// Seconds left on the countdown, only in time-limit mode.
    pub remaining_seconds: Option<u64>,
}

/// The aggregate root for one play-through of a quiz.
#[derive(Debug)]
pub struct QuizSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) phase: SessionPhase,
    quiz: Quiz,
    pub(crate) current_index: usize,
    pub(crate) score: u32,
    pub(crate) wrong_answers: u32,
    countdown: Option<Countdown>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<SessionEvent>,
}

impl QuizSession {
    /// Creates a session for `quiz`. Call [`QuizSession::start`] to begin.
    #[must_use]
    pub fn new(id: Uuid, quiz: Quiz) -> Self {
        Self {
            id,
            version: 0,
            phase: SessionPhase::Created,
            quiz,
            current_index: 0,
            score: 0,
            wrong_answers: 0,
            countdown: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the next sequence number for a new event.
    fn next_sequence_number(&self) -> i64 {
        self.version + 1
    }

    fn raise(&mut self, kind: SessionEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = SessionEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    fn end(&mut self, reason: EndReason, correlation_id: Uuid, clock: &dyn Clock) {
        let kind = SessionEventKind::SessionEnded(SessionEnded {
            session_id: self.id,
            reason,
            score: self.score,
            wrong_answers: self.wrong_answers,
        });
        self.raise(kind, correlation_id, clock);
    }

    fn require_in_progress(&self) -> Result<(), DomainError> {
        if self.phase == SessionPhase::InProgress {
            Ok(())
        } else {
            Err(DomainError::Validation(
                "session must be in InProgress phase".to_owned(),
            ))
        }
    }

    /// Starts the session, arming the countdown in time-limit mode.
    ///
    /// A quiz without questions ends immediately.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if not in `Created` phase.
    pub fn start(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.phase != SessionPhase::Created {
            return Err(DomainError::Validation(
                "session must be in Created phase".to_owned(),
            ));
        }
        let quiz_options = &self.quiz.options.quiz;
        let deadline = (quiz_options.mode == GameMode::TimeLimit)
            .then(|| Countdown::start(clock, quiz_options.time_limit_seconds()).deadline());
        let kind = SessionEventKind::SessionStarted(SessionStarted {
            session_id: self.id,
            quiz_id: self.quiz.id.clone(),
            mode: quiz_options.mode,
            question_count: self.quiz.len(),
            deadline,
        });
        self.raise(kind, correlation_id, clock);

        if self.quiz.is_empty() {
            self.end(EndReason::QuestionsExhausted, correlation_id, clock);
        }
        Ok(())
    }

    /// Submits an answer to the current question.
    ///
    /// A correct answer scores and advances. A wrong answer ends a
    /// sudden-death session and advances otherwise. Answering the last
    /// question ends the session. An answer arriving after the countdown ran
    /// out ends the session with `TimeExpired` and is not counted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if not in `InProgress` phase.
    pub fn submit_answer(
        &mut self,
        answer: u64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<AnswerOutcome, DomainError> {
        self.require_in_progress()?;

        if self.countdown.is_some_and(|c| c.is_expired(clock)) {
            self.end(EndReason::TimeExpired, correlation_id, clock);
            return Ok(AnswerOutcome::TooLate);
        }

        let Some(question) = self.quiz.question(self.current_index) else {
            return Err(DomainError::Validation(
                "no question left to answer".to_owned(),
            ));
        };
        let correct = question.is_correct(answer);
        let correct_answer = question.correct_answer;
        let sudden_death_loss = !correct && self.mode() == GameMode::SuddenDeath;
        let next_index = if sudden_death_loss {
            self.current_index
        } else {
            self.current_index + 1
        };

        let kind = SessionEventKind::AnswerSubmitted(AnswerSubmitted {
            session_id: self.id,
            question_index: self.current_index,
            answer,
            correct,
            next_index,
        });
        self.raise(kind, correlation_id, clock);

        if sudden_death_loss {
            self.end(EndReason::WrongAnswer, correlation_id, clock);
        } else if self.current_index >= self.quiz.len() {
            self.end(EndReason::QuestionsExhausted, correlation_id, clock);
        }

        Ok(if correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Wrong { correct_answer }
        })
    }

    /// Ends the session when the countdown has run out.
    ///
    /// Returns `true` if this call ended the session. Stale expiries (session
    /// already ended, no countdown, deadline not reached) are ignored.
    pub fn expire_timer(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> bool {
        if self.phase != SessionPhase::InProgress {
            return false;
        }
        match self.countdown {
            Some(countdown) if countdown.is_expired(clock) => {
                self.end(EndReason::TimeExpired, correlation_id, clock);
                true
            }
            _ => false,
        }
    }

    /// Once-per-second timer update: expires the session at the deadline and
    /// returns the seconds left, or `None` when there is no running countdown.
    pub fn tick(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Option<u64> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        let countdown = self.countdown?;
        self.expire_timer(correlation_id, clock);
        Some(countdown.remaining_seconds(clock))
    }

    /// Abandons the session. No result will be recorded.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if not in `InProgress` phase.
    pub fn quit(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.require_in_progress()?;
        self.end(EndReason::Abandoned, correlation_id, clock);
        Ok(())
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.quiz.options.quiz.mode
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        matches!(self.phase, SessionPhase::Ended(_))
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        match self.phase {
            SessionPhase::Ended(reason) => Some(reason),
            SessionPhase::Created | SessionPhase::InProgress => None,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn wrong_answers(&self) -> u32 {
        self.wrong_answers
    }

    /// The question currently shown, if the session is running.
    #[must_use]
    pub fn current_question(&self) -> Option<&MathQuestion> {
        if self.phase == SessionPhase::InProgress {
            self.quiz.question(self.current_index)
        } else {
            None
        }
    }

    /// Current state for display.
    #[must_use]
    pub fn snapshot(&self, clock: &dyn Clock) -> SessionSnapshot {
        let remaining_seconds = self.countdown.map(|c| {
            if self.phase == SessionPhase::InProgress {
                c.remaining_seconds(clock)
            } else {
                0
            }
        });
        SessionSnapshot {
            session_id: self.id,
            quiz_id: self.quiz.id.clone(),
            mode: self.mode(),
            current_question: self.current_question().cloned(),
            question_index: self.current_index,
            question_count: self.quiz.len(),
            score: self.score,
            wrong_answers: self.wrong_answers,
            ended: self.is_ended(),
            end_reason: self.end_reason(),
            remaining_seconds,
        }
    }

    /// The result to record for this session.
    ///
    /// `None` while running, after an abandon, or when the quiz has no id.
    #[must_use]
    pub fn exam_result(&self) -> Option<ExamResult> {
        match self.phase {
            SessionPhase::Ended(EndReason::Abandoned)
            | SessionPhase::Created
            | SessionPhase::InProgress => None,
            SessionPhase::Ended(_) if self.quiz.id.is_empty() => None,
            SessionPhase::Ended(_) => Some(ExamResult {
                id: self.quiz.id.clone(),
                score: score_percent(self.score, self.wrong_answers),
                passed: self.score > self.quiz.options.quiz.pass_threshold,
            }),
        }
    }
}

impl AggregateRoot for QuizSession {
    type Event = SessionEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            SessionEventKind::SessionStarted(e) => {
                self.phase = SessionPhase::InProgress;
                self.countdown = e.deadline.map(Countdown::until);
            }
            SessionEventKind::AnswerSubmitted(e) => {
                if e.correct {
                    self.score += 1;
                } else {
                    self.wrong_answers += 1;
                }
                self.current_index = e.next_index;
            }
            SessionEventKind::SessionEnded(e) => {
                self.phase = SessionPhase::Ended(e.reason);
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use multiplicathlon_core::event::DomainEvent;
    use multiplicathlon_quiz::domain::options::GameOptions;
    use multiplicathlon_quiz::domain::question::{Operation, generate_question};
    use multiplicathlon_test_support::{FixedClock, ManualClock, MockRng};

    use super::*;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn manual_clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    /// Quiz of `n` questions `2 x (i + 2)`.
    fn quiz(id: &str, mode: GameMode, n: u64) -> Quiz {
        let mut options = GameOptions::belt(Some(&[2]), None);
        options.quiz.mode = mode;
        options.quiz.question_count = u32::try_from(n).unwrap();
        let questions = (0..n)
            .map(|i| generate_question(&mut MockRng, Operation::Multiplication, 2, i + 2, 0).unwrap())
            .collect();
        Quiz {
            id: id.to_owned(),
            options,
            questions,
        }
    }

    fn started(quiz: Quiz, clock: &dyn Clock) -> QuizSession {
        let mut session = QuizSession::new(Uuid::new_v4(), quiz);
        session.start(Uuid::new_v4(), clock).unwrap();
        session
    }

    #[test]
    fn test_start_emits_started_event_with_deadline() {
        let clock = fixed_clock();
        let mut session = QuizSession::new(Uuid::new_v4(), quiz("BELT_1", GameMode::TimeLimit, 3));
        let correlation_id = Uuid::new_v4();

        session.start(correlation_id, &clock).unwrap();

        let events = session.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "session.started");
        assert_eq!(events[0].metadata().sequence_number, 1);
        assert_eq!(events[0].metadata().correlation_id, correlation_id);
        match &events[0].kind {
            SessionEventKind::SessionStarted(e) => {
                assert_eq!(e.quiz_id, "BELT_1");
                assert_eq!(e.question_count, 3);
                assert_eq!(
                    e.deadline,
                    Some(Utc.with_ymd_and_hms(2026, 1, 15, 10, 1, 0).unwrap())
                );
            }
            other => panic!("expected SessionStarted, got {other:?}"),
        }
        assert_eq!(session.snapshot(&clock).remaining_seconds, Some(60));
    }

    #[test]
    fn test_start_twice_fails() {
        let clock = fixed_clock();
        let mut session = started(quiz("BELT_1", GameMode::Endless, 3), &clock);
        match session.start(Uuid::new_v4(), &clock) {
            Err(DomainError::Validation(msg)) => {
                assert_eq!(msg, "session must be in Created phase");
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_no_countdown_outside_time_limit_mode() {
        let clock = fixed_clock();
        let mut session = started(quiz("", GameMode::Endless, 3), &clock);
        assert_eq!(session.snapshot(&clock).remaining_seconds, None);
        assert_eq!(session.tick(Uuid::new_v4(), &clock), None);
    }

    #[test]
    fn test_correct_answer_scores_and_advances() {
        let clock = fixed_clock();
        let mut session = started(quiz("BELT_1", GameMode::TimeLimit, 3), &clock);

        let outcome = session.submit_answer(4, Uuid::new_v4(), &clock).unwrap();

        assert_eq!(outcome, AnswerOutcome::Correct);
        let snapshot = session.snapshot(&clock);
        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.question_index, 1);
        assert_eq!(snapshot.current_question.unwrap().prompt(), "2 x 3");
    }

    #[test]
    fn test_wrong_answer_in_time_limit_mode_advances() {
        let clock = fixed_clock();
        let mut session = started(quiz("BELT_1", GameMode::TimeLimit, 3), &clock);

        let outcome = session.submit_answer(5, Uuid::new_v4(), &clock).unwrap();

        assert_eq!(outcome, AnswerOutcome::Wrong { correct_answer: 4 });
        assert_eq!(session.wrong_answers(), 1);
        assert_eq!(session.snapshot(&clock).question_index, 1);
        assert!(!session.is_ended());
    }

    #[test]
    fn test_sudden_death_first_wrong_answer_ends_session() {
        let clock = fixed_clock();
        let mut session = started(quiz("suddenDeath", GameMode::SuddenDeath, 5), &clock);

        session.submit_answer(99, Uuid::new_v4(), &clock).unwrap();

        let snapshot = session.snapshot(&clock);
        assert!(snapshot.ended);
        assert_eq!(snapshot.end_reason, Some(EndReason::WrongAnswer));
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.wrong_answers, 1);
        assert!(snapshot.current_question.is_none());
        assert!(matches!(
            session.submit_answer(6, Uuid::new_v4(), &clock),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_answering_last_question_ends_session() {
        let clock = fixed_clock();
        let mut session = started(quiz("BELT_1", GameMode::Endless, 2), &clock);

        session.submit_answer(4, Uuid::new_v4(), &clock).unwrap();
        session.submit_answer(0, Uuid::new_v4(), &clock).unwrap();

        assert_eq!(session.end_reason(), Some(EndReason::QuestionsExhausted));
        let event_types: Vec<&str> = session
            .uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect();
        assert_eq!(
            event_types,
            vec![
                "session.started",
                "session.answer_submitted",
                "session.answer_submitted",
                "session.ended"
            ]
        );
        let sequence: Vec<i64> = session
            .uncommitted_events()
            .iter()
            .map(|e| e.metadata().sequence_number)
            .collect();
        assert_eq!(sequence, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_timer_expires_once_at_deadline() {
        let clock = manual_clock();
        let mut session = started(quiz("timeLimit", GameMode::TimeLimit, 20), &clock);

        clock.advance_seconds(30);
        assert_eq!(session.tick(Uuid::new_v4(), &clock), Some(30));
        assert!(!session.is_ended());

        clock.advance_seconds(30);
        assert_eq!(session.tick(Uuid::new_v4(), &clock), Some(0));
        assert_eq!(session.end_reason(), Some(EndReason::TimeExpired));

        clock.advance_seconds(1);
        assert_eq!(session.tick(Uuid::new_v4(), &clock), None);
        assert!(!session.expire_timer(Uuid::new_v4(), &clock));
        let ended_events = session
            .uncommitted_events()
            .iter()
            .filter(|e| e.event_type() == "session.ended")
            .count();
        assert_eq!(ended_events, 1);
    }

    #[test]
    fn test_expire_timer_before_deadline_is_ignored() {
        let clock = manual_clock();
        let mut session = started(quiz("timeLimit", GameMode::TimeLimit, 20), &clock);
        clock.advance_seconds(10);
        assert!(!session.expire_timer(Uuid::new_v4(), &clock));
        assert!(!session.is_ended());
    }

    #[test]
    fn test_answer_after_deadline_is_too_late() {
        let clock = manual_clock();
        let mut session = started(quiz("BELT_1", GameMode::TimeLimit, 20), &clock);
        session.submit_answer(4, Uuid::new_v4(), &clock).unwrap();
        clock.advance_seconds(61);

        let outcome = session.submit_answer(6, Uuid::new_v4(), &clock).unwrap();

        assert_eq!(outcome, AnswerOutcome::TooLate);
        assert_eq!(session.score(), 1);
        assert_eq!(session.end_reason(), Some(EndReason::TimeExpired));
        assert_eq!(session.snapshot(&clock).remaining_seconds, Some(0));
    }

    #[test]
    fn test_time_limit_scoring_below_threshold_does_not_pass() {
        let clock = manual_clock();
        let mut session = started(quiz("BELT_1", GameMode::TimeLimit, 30), &clock);
        for i in 0..20_u64 {
            let answer = if i < 18 { 2 * (i + 2) } else { 0 };
            session.submit_answer(answer, Uuid::new_v4(), &clock).unwrap();
        }
        clock.advance_seconds(60);
        assert!(session.expire_timer(Uuid::new_v4(), &clock));

        let result = session.exam_result().unwrap();
        assert_eq!(result.id, "BELT_1");
        assert_eq!(result.score, 90);
        assert!(!result.passed);
    }

    #[test]
    fn test_score_above_threshold_passes() {
        let clock = fixed_clock();
        let mut session = started(quiz("BELT_2", GameMode::Endless, 20), &clock);
        for i in 0..20_u64 {
            let answer = if i < 19 { 2 * (i + 2) } else { 0 };
            session.submit_answer(answer, Uuid::new_v4(), &clock).unwrap();
        }
        let result = session.exam_result().unwrap();
        assert_eq!(result.score, 95);
        assert!(result.passed);
    }

    #[test]
    fn test_quit_produces_no_result() {
        let clock = fixed_clock();
        let mut session = started(quiz("BELT_1", GameMode::TimeLimit, 5), &clock);
        session.submit_answer(4, Uuid::new_v4(), &clock).unwrap();

        session.quit(Uuid::new_v4(), &clock).unwrap();

        assert_eq!(session.end_reason(), Some(EndReason::Abandoned));
        assert!(session.exam_result().is_none());
        assert!(session.quit(Uuid::new_v4(), &clock).is_err());
    }

    #[test]
    fn test_result_without_answers_scores_zero() {
        let clock = manual_clock();
        let mut session = started(quiz("BELT_1", GameMode::TimeLimit, 5), &clock);
        clock.advance_seconds(60);
        session.tick(Uuid::new_v4(), &clock);

        let result = session.exam_result().unwrap();
        assert_eq!(result.score, 0);
        assert!(!result.passed);
    }

    #[test]
    fn test_untracked_quiz_produces_no_result() {
        let clock = fixed_clock();
        let mut session = started(quiz("", GameMode::Endless, 1), &clock);
        session.submit_answer(4, Uuid::new_v4(), &clock).unwrap();
        assert!(session.is_ended());
        assert!(session.exam_result().is_none());
    }

    #[test]
    fn test_running_session_has_no_result() {
        let clock = fixed_clock();
        let session = started(quiz("BELT_1", GameMode::Endless, 3), &clock);
        assert!(session.exam_result().is_none());
    }

    #[test]
    fn test_empty_quiz_ends_on_start() {
        let clock = fixed_clock();
        let session = started(quiz("BELT_1", GameMode::Endless, 0), &clock);
        assert_eq!(session.end_reason(), Some(EndReason::QuestionsExhausted));
        assert_eq!(session.exam_result().unwrap().score, 0);
    }

    #[test]
    fn test_take_uncommitted_events_drains_buffer() {
        let clock = fixed_clock();
        let mut session = started(quiz("BELT_1", GameMode::Endless, 3), &clock);
        assert_eq!(session.take_uncommitted_events().len(), 1);
        assert!(session.uncommitted_events().is_empty());
        assert_eq!(session.version(), 1);

        session.submit_answer(4, Uuid::new_v4(), &clock).unwrap();
        assert_eq!(
            session.uncommitted_events()[0].metadata().sequence_number,
            2
        );
    }
}
