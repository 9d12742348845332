//! Game controller: maps rendering events onto quiz generation, the session
//! state machine and the results aggregator.
//!
//! The controller owns at most one live [`QuizSession`]. When a session ends
//! its result is merged into the active profile and the session is dropped,
//! which also stops its countdown.

use multiplicathlon_core::aggregate::AggregateRoot;
use multiplicathlon_core::error::DomainError;
use multiplicathlon_core::event::DomainEvent;
use multiplicathlon_quiz::application::command_handlers::{
    handle_generate_quiz, handle_update_game_options,
};
use multiplicathlon_quiz::application::query_handlers::load_game_options;
use multiplicathlon_quiz::domain::catalog::free_play;
use multiplicathlon_quiz::domain::commands::{GenerateQuiz, UpdateGameOptions};
use multiplicathlon_quiz::domain::options::{GameMode, GameOptions};
use multiplicathlon_session::application::command_handlers::{
    handle_create_profile, handle_record_exam_result, handle_switch_profile,
};
use multiplicathlon_session::domain::aggregates::{AnswerOutcome, QuizSession, SessionSnapshot};
use multiplicathlon_session::domain::commands::{CreateProfile, RecordExamResult, SwitchProfile};
use multiplicathlon_session::domain::profile::{ExamResult, ProfileList};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Events sent by the rendering collaborator.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Start a session with explicit options.
    ModeSelected {
        /// Exam or mode identifier; empty for an untracked game.
        id: String,
        /// Options to generate the quiz from.
        options: GameOptions,
    },
    /// Start the catalog exam with this id.
    ExamSelected(String),
    /// Start a free-play game with the saved options.
    FreePlaySelected(GameMode),
    /// Save new options.
    OptionsChanged(GameOptions),
    /// Answer the current question.
    AnswerSubmitted(u64),
    /// Abandon the current session.
    QuitRequested,
    /// Create a profile with this name.
    ProfileCreated(String),
    /// Make the named profile active.
    ProfileSwitched(String),
    /// One-second timer tick.
    Tick,
}

/// State pushed back to the rendering collaborator.
#[derive(Debug, Clone)]
pub enum ViewUpdate {
    /// A new session is showing its first question.
    SessionStarted(SessionSnapshot),
    /// An answer was checked.
    AnswerChecked {
        /// Whether it was right.
        outcome: AnswerOutcome,
        /// State after the answer.
        snapshot: SessionSnapshot,
    },
    /// The countdown moved.
    TimerTick(SessionSnapshot),
    /// The session is over.
    SessionEnded {
        /// Final state.
        snapshot: SessionSnapshot,
        /// The session's result, `None` if abandoned or untracked. It is
        /// reported even when it could not be saved.
        result: Option<ExamResult>,
    },
    /// New options were saved.
    OptionsSaved(GameOptions),
    /// The profile list changed.
    ProfilesChanged(ProfileList),
}

/// Drives one learner's games.
#[derive(Debug)]
pub struct GameController {
    state: AppState,
    session: Option<QuizSession>,
}

impl GameController {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            session: None,
        }
    }

    /// The live session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// Whether a time-limit session is running and needs timer ticks.
    #[must_use]
    pub fn has_running_countdown(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.is_ended() && s.mode() == GameMode::TimeLimit)
    }

    /// Handles one event and returns the resulting view updates.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` when the event is not valid in the current
    /// state (no session, a session already running, unknown exam, invalid
    /// options or profile name) or when the store fails.
    #[instrument(skip(self))]
    pub async fn handle(&mut self, event: UiEvent) -> Result<Vec<ViewUpdate>, AppError> {
        let correlation_id = Uuid::new_v4();
        match event {
            UiEvent::ModeSelected { id, options } => {
                self.start_session(id, options, correlation_id).await
            }
            UiEvent::ExamSelected(exam_id) => {
                let exam = self.state.catalog.require(&exam_id)?;
                let (id, options) = (exam.id.clone(), exam.options.clone());
                self.start_session(id, options, correlation_id).await
            }
            UiEvent::FreePlaySelected(mode) => {
                let saved = load_game_options(&*self.state.store).await?;
                let (id, options) = free_play(&saved, mode);
                self.start_session(id, options, correlation_id).await
            }
            UiEvent::OptionsChanged(options) => {
                let command = UpdateGameOptions {
                    correlation_id,
                    options,
                };
                handle_update_game_options(&command, &*self.state.store).await?;
                Ok(vec![ViewUpdate::OptionsSaved(command.options)])
            }
            UiEvent::AnswerSubmitted(answer) => {
                let clock = &*self.state.clock;
                let session = self.session.as_mut().ok_or_else(no_session)?;
                let outcome = session.submit_answer(answer, correlation_id, clock)?;
                let mut updates = vec![ViewUpdate::AnswerChecked {
                    outcome,
                    snapshot: session.snapshot(clock),
                }];
                updates.extend(self.settle(correlation_id).await);
                Ok(updates)
            }
            UiEvent::QuitRequested => {
                let session = self.session.as_mut().ok_or_else(no_session)?;
                session.quit(correlation_id, &*self.state.clock)?;
                Ok(self.settle(correlation_id).await.into_iter().collect())
            }
            UiEvent::ProfileCreated(name) => {
                let command = CreateProfile {
                    correlation_id,
                    name,
                };
                let profiles = handle_create_profile(&command, &*self.state.store).await?;
                Ok(vec![ViewUpdate::ProfilesChanged(profiles)])
            }
            UiEvent::ProfileSwitched(name) => {
                let command = SwitchProfile {
                    correlation_id,
                    name,
                };
                let profiles = handle_switch_profile(&command, &*self.state.store).await?;
                Ok(vec![ViewUpdate::ProfilesChanged(profiles)])
            }
            UiEvent::Tick => Ok(self.tick(correlation_id).await),
        }
    }

    async fn start_session(
        &mut self,
        id: String,
        options: GameOptions,
        correlation_id: Uuid,
    ) -> Result<Vec<ViewUpdate>, AppError> {
        if self.session.as_ref().is_some_and(|s| !s.is_ended()) {
            return Err(
                DomainError::Validation("a session is already in progress".to_owned()).into(),
            );
        }
        let command = GenerateQuiz {
            correlation_id,
            quiz_id: id,
            options,
        };
        let quiz = handle_generate_quiz(&command, &*self.state.rng)?;
        let clock = &*self.state.clock;
        let mut session = QuizSession::new(Uuid::new_v4(), quiz);
        session.start(correlation_id, clock)?;
        info!(
            session_id = %session.id,
            quiz_id = %command.quiz_id,
            mode = %session.mode(),
            "session started"
        );

        let mut updates = vec![ViewUpdate::SessionStarted(session.snapshot(clock))];
        self.session = Some(session);
        updates.extend(self.settle(correlation_id).await);
        Ok(updates)
    }

    async fn tick(&mut self, correlation_id: Uuid) -> Vec<ViewUpdate> {
        let clock = &*self.state.clock;
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let mut updates = Vec::new();
        if session.tick(correlation_id, clock).is_some() && !session.is_ended() {
            updates.push(ViewUpdate::TimerTick(session.snapshot(clock)));
        }
        updates.extend(self.settle(correlation_id).await);
        updates
    }

    /// Drains the session's events and, if it has ended, records its result
    /// and drops it. A failure to record is logged; the ended session is
    /// still reported.
    async fn settle(&mut self, correlation_id: Uuid) -> Option<ViewUpdate> {
        let session = self.session.as_mut()?;
        for event in session.take_uncommitted_events() {
            debug!(
                event_type = event.event_type(),
                sequence_number = event.metadata().sequence_number,
                payload = %event.to_payload(),
                "session event"
            );
        }
        if !session.is_ended() {
            return None;
        }

        let snapshot = session.snapshot(&*self.state.clock);
        let result = session.exam_result();
        self.session = None;
        info!(
            reason = ?snapshot.end_reason,
            score = snapshot.score,
            wrong_answers = snapshot.wrong_answers,
            "session ended"
        );

        if let Some(exam_result) = &result {
            let command = RecordExamResult {
                correlation_id,
                result: Some(exam_result.clone()),
            };
            match handle_record_exam_result(&command, &*self.state.store).await {
                Ok(_) => {}
                Err(DomainError::ProfileNotFound(_)) => {
                    warn!(exam_id = %exam_result.id, "no active profile, result not recorded");
                }
                Err(e) => {
                    error!(exam_id = %exam_result.id, error = %e, "failed to record exam result");
                }
            }
        }

        Some(ViewUpdate::SessionEnded { snapshot, result })
    }
}

fn no_session() -> DomainError {
    DomainError::Validation("no session in progress".to_owned())
}
