//! # ai-trivia
//!
//! A terminal trivia game whose questions are written by a language model.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ai_trivia::{Settings, Trivia, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // Reads OPENAI_API_KEY from the environment
//!     let trivia = Trivia::from_settings(&Settings::default())?;
//!
//!     // Run the game in the terminal
//!     trivia.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! The game logic is usable without a terminal: [`GameController`] drives
//! one game against any [`CompletionService`], and [`resolver::resolve`]
//! grades a single answer.

mod app;
pub mod config;
pub mod game;
pub mod generator;
pub mod llm_client;
pub mod models;
pub mod resolver;
pub mod terminal;
mod ui;

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_more::{Display, Error, From};
use tracing::info;

pub use app::{App, SetupField};
pub use config::{ConfigError, Settings};
pub use game::{Feedback, GameController, GamePhase, GameSession, InvalidTransition};
pub use generator::{GenerationError, QuestionGenerator};
pub use llm_client::{CompletionService, LlmClient, LlmConfig, LlmError, LlmProvider};
pub use models::{AppState, CorrectKey, Difficulty, Question, QuestionCount};
pub use resolver::resolve;

/// Error type for running the game.
#[derive(Debug, Display, Error, From)]
pub enum QuizError {
    /// The generation service is not configured.
    #[display("{_0}")]
    Config(ConfigError),
    /// IO error while driving the terminal.
    #[display("IO error: {_0}")]
    Io(io::Error),
}

/// A trivia game that can be run in the terminal.
pub struct Trivia {
    app: App,
}

impl Trivia {
    /// Creates a game that asks `service` for its questions.
    pub fn new(service: Box<dyn CompletionService>) -> Self {
        let controller = GameController::new(QuestionGenerator::new(service));
        Self {
            app: App::new(controller),
        }
    }

    /// Creates a game backed by the configured generation service.
    ///
    /// Fails when the provider's API key is not in the environment.
    pub fn from_settings(settings: &Settings) -> Result<Self, QuizError> {
        let client = LlmClient::new(settings.llm_config()?);
        Ok(Self::new(Box::new(client)))
    }

    /// Pre-fills the setup screen.
    pub fn with_setup(
        mut self,
        topic: Option<&str>,
        difficulty: Option<Difficulty>,
        count: Option<usize>,
    ) -> Self {
        self.app = self.app.with_setup(topic, difficulty, count);
        self
    }

    /// Run the game in the terminal.
    ///
    /// This will take over the terminal, display the game UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app).await;
        terminal::restore(&mut term)?;
        info!(score = self.app.score(), "Left the game");
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::TriviaTerminal,
    app: &mut App,
) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if app.is_generating() {
            app.generate().await;
            terminal::discard_pending_input()?;
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if is_interrupt(&key) || handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Applies one key press. Returns true if the app should exit.
pub fn handle_input(app: &mut App, key: KeyCode) -> bool {
    match app.state() {
        AppState::Setup if app.focus() == SetupField::CustomTopic => {
            handle_topic_input(app, key);
            false
        }
        AppState::Setup => handle_setup_input(app, key),
        AppState::Generating => false,
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_topic_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter => {
            app.request_start();
        }
        KeyCode::Tab | KeyCode::Down | KeyCode::Esc => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
        KeyCode::Backspace => app.custom_topic_pop(),
        KeyCode::Char(c) => app.custom_topic_push(c),
        _ => {}
    }
}

fn handle_setup_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
            app.focus_previous();
            false
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
            app.focus_next();
            false
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.adjust_focused(false);
            false
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.adjust_focused(true);
            false
        }
        KeyCode::Enter => {
            app.request_start();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> bool {
    match (app.phase(), key) {
        (_, KeyCode::Char('q') | KeyCode::Char('Q')) => true,
        (GamePhase::AwaitingAnswer, KeyCode::Up | KeyCode::Char('k')) => {
            app.select_previous_option();
            false
        }
        (GamePhase::AwaitingAnswer, KeyCode::Down | KeyCode::Char('j')) => {
            app.select_next_option();
            false
        }
        (GamePhase::AwaitingAnswer, KeyCode::Enter | KeyCode::Char(' ')) => {
            app.submit_answer();
            false
        }
        (GamePhase::Graded, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n')) => {
            app.next_question();
            false
        }
        _ => false,
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.play_again();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}
