//! The game state machine.

use derive_more::{Display, Error};
use strum::Display as StrumDisplay;
use tracing::{debug, info, instrument};

use crate::generator::{GenerationError, QuestionGenerator};
use crate::models::{Difficulty, Question};

use super::session::{Feedback, GameSession};

/// Where the game currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum GamePhase {
    /// No session; waiting for a start.
    Idle,
    /// A question is shown and has not been graded.
    AwaitingAnswer,
    /// The current question has been graded.
    Graded,
    /// Every question has been answered.
    GameOver,
}

/// Player events other than start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum GameEvent {
    Submit,
    Next,
    PlayAgain,
}

/// An event arrived in a phase that does not accept it. Nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("{event} is not allowed while {phase}")]
pub struct InvalidTransition {
    pub event: GameEvent,
    pub phase: GamePhase,
}

/// Owns the active [`GameSession`] and moves it through its phases.
pub struct GameController {
    generator: QuestionGenerator,
    session: Option<GameSession>,
}

impl GameController {
    pub fn new(generator: QuestionGenerator) -> Self {
        Self {
            generator,
            session: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        match &self.session {
            None => GamePhase::Idle,
            Some(session) if session.is_over() => GamePhase::GameOver,
            Some(session) if session.answered() => GamePhase::Graded,
            Some(_) => GamePhase::AwaitingAnswer,
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref()?.current_question()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.session.as_ref()?.feedback()
    }

    pub fn score(&self) -> usize {
        self.session.as_ref().map_or(0, GameSession::score)
    }

    pub fn total(&self) -> usize {
        self.session.as_ref().map_or(0, GameSession::total)
    }

    /// Starts a new game, dropping any game in progress.
    ///
    /// Always asks the generator for a fresh set. On failure the controller
    /// is left `Idle` and the error is handed back for display.
    #[instrument(skip(self))]
    pub async fn start(
        &mut self,
        topic: &str,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<usize, GenerationError> {
        if self.session.take().is_some() {
            debug!("Discarding previous session");
        }

        let questions = self.generator.try_generate(topic, difficulty, count).await?;
        let total = questions.len();
        self.session = Some(GameSession::new(questions));
        info!(total, "Game started");
        Ok(total)
    }

    /// Grades `choice` for the current question. Allowed once per question.
    #[instrument(skip(self))]
    pub fn submit(&mut self, choice: &str) -> Result<&Feedback, InvalidTransition> {
        let phase = self.phase();
        let invalid = InvalidTransition {
            event: GameEvent::Submit,
            phase,
        };
        if phase != GamePhase::AwaitingAnswer {
            debug!(%invalid, "Ignoring event");
            return Err(invalid);
        }

        let session = self.session.as_mut().ok_or(invalid)?;
        let feedback = session.grade(choice).ok_or(invalid)?;
        debug!(correct = feedback.correct, "Answer graded");
        Ok(feedback)
    }

    /// Moves past a graded question.
    #[instrument(skip(self))]
    pub fn next(&mut self) -> Result<GamePhase, InvalidTransition> {
        let phase = self.phase();
        let invalid = InvalidTransition {
            event: GameEvent::Next,
            phase,
        };
        if phase != GamePhase::Graded {
            debug!(%invalid, "Ignoring event");
            return Err(invalid);
        }

        let session = self.session.as_mut().ok_or(invalid)?;
        session.advance();
        if session.is_over() {
            info!(score = session.score(), total = session.total(), "Game over");
        }
        Ok(self.phase())
    }

    /// Clears a finished game so a new one can start.
    #[instrument(skip(self))]
    pub fn play_again(&mut self) -> Result<(), InvalidTransition> {
        let phase = self.phase();
        if phase != GamePhase::GameOver {
            let invalid = InvalidTransition {
                event: GameEvent::PlayAgain,
                phase,
            };
            debug!(%invalid, "Ignoring event");
            return Err(invalid);
        }
        self.session = None;
        Ok(())
    }
}
