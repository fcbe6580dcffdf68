use tracing::{debug, warn};

use crate::game::{Feedback, GameController, GamePhase, GameSession};
use crate::models::{AppState, CUSTOM_TOPIC_LABEL, Difficulty, Question, QuestionCount, TOPIC_PRESETS};

const CUSTOM_TOPIC_INDEX: usize = TOPIC_PRESETS.len();
const CUSTOM_TOPIC_MAX_LEN: usize = 60;

/// Input field focused on the setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Topic,
    CustomTopic,
    Difficulty,
    Count,
    Start,
}

/// Everything the terminal UI needs between key presses.
pub struct App {
    controller: GameController,
    generating: bool,
    topic_index: usize,
    custom_topic: String,
    difficulty: Difficulty,
    count: QuestionCount,
    focus: SetupField,
    error: Option<String>,
    selected_option: usize,
    result_scroll: usize,
}

impl App {
    pub fn new(controller: GameController) -> Self {
        Self {
            controller,
            generating: false,
            topic_index: 0,
            custom_topic: String::new(),
            difficulty: Difficulty::default(),
            count: QuestionCount::default(),
            focus: SetupField::Topic,
            error: None,
            selected_option: 0,
            result_scroll: 0,
        }
    }

    /// Pre-fills the setup screen. Unknown topics become a custom topic.
    pub fn with_setup(
        mut self,
        topic: Option<&str>,
        difficulty: Option<Difficulty>,
        count: Option<usize>,
    ) -> Self {
        if let Some(topic) = topic {
            match TOPIC_PRESETS
                .iter()
                .position(|preset| preset.eq_ignore_ascii_case(topic.trim()))
            {
                Some(index) => self.topic_index = index,
                None => {
                    self.topic_index = CUSTOM_TOPIC_INDEX;
                    self.custom_topic = topic.trim().chars().take(CUSTOM_TOPIC_MAX_LEN).collect();
                }
            }
        }
        if let Some(difficulty) = difficulty {
            self.difficulty = difficulty;
        }
        if let Some(count) = count {
            self.count = QuestionCount::clamped(count);
        }
        self
    }

    pub fn state(&self) -> AppState {
        if self.generating {
            return AppState::Generating;
        }
        match self.controller.phase() {
            GamePhase::Idle => AppState::Setup,
            GamePhase::AwaitingAnswer | GamePhase::Graded => AppState::Quiz,
            GamePhase::GameOver => AppState::Result,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.controller.phase()
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.controller.session()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.controller.current_question()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.controller.feedback()
    }

    pub fn current_question_number(&self) -> usize {
        self.session().map_or(0, |s| s.cursor() + 1)
    }

    pub fn total_questions(&self) -> usize {
        self.controller.total()
    }

    pub fn score(&self) -> usize {
        self.controller.score()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // Setup screen

    pub fn focus(&self) -> SetupField {
        self.focus
    }

    pub fn is_custom_topic(&self) -> bool {
        self.topic_index == CUSTOM_TOPIC_INDEX
    }

    pub fn topic_label(&self) -> &str {
        TOPIC_PRESETS
            .get(self.topic_index)
            .copied()
            .unwrap_or(CUSTOM_TOPIC_LABEL)
    }

    pub fn custom_topic(&self) -> &str {
        &self.custom_topic
    }

    /// Topic to generate for, or `None` while the custom topic is blank.
    pub fn topic(&self) -> Option<String> {
        if self.is_custom_topic() {
            let custom = self.custom_topic.trim();
            (!custom.is_empty()).then(|| custom.to_string())
        } else {
            Some(self.topic_label().to_string())
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn count(&self) -> QuestionCount {
        self.count
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            SetupField::Topic if self.is_custom_topic() => SetupField::CustomTopic,
            SetupField::Topic | SetupField::CustomTopic => SetupField::Difficulty,
            SetupField::Difficulty => SetupField::Count,
            SetupField::Count => SetupField::Start,
            SetupField::Start => SetupField::Topic,
        };
    }

    pub fn focus_previous(&mut self) {
        self.focus = match self.focus {
            SetupField::Topic => SetupField::Start,
            SetupField::CustomTopic => SetupField::Topic,
            SetupField::Difficulty if self.is_custom_topic() => SetupField::CustomTopic,
            SetupField::Difficulty => SetupField::Topic,
            SetupField::Count => SetupField::Difficulty,
            SetupField::Start => SetupField::Count,
        };
    }

    /// Changes the focused value one step forward (`forward`) or back.
    pub fn adjust_focused(&mut self, forward: bool) {
        let topics = CUSTOM_TOPIC_INDEX + 1;
        match self.focus {
            SetupField::Topic if forward => self.topic_index = (self.topic_index + 1) % topics,
            SetupField::Topic => self.topic_index = (self.topic_index + topics - 1) % topics,
            SetupField::Difficulty if forward => self.difficulty = self.difficulty.next(),
            SetupField::Difficulty => self.difficulty = self.difficulty.previous(),
            SetupField::Count if forward => self.count = self.count.increment(),
            SetupField::Count => self.count = self.count.decrement(),
            SetupField::CustomTopic | SetupField::Start => {}
        }
    }

    pub fn custom_topic_push(&mut self, c: char) {
        if self.custom_topic.chars().count() < CUSTOM_TOPIC_MAX_LEN {
            self.custom_topic.push(c);
        }
    }

    pub fn custom_topic_pop(&mut self) {
        self.custom_topic.pop();
    }

    /// Asks for a new game. Returns false when the setup is incomplete.
    pub fn request_start(&mut self) -> bool {
        if self.topic().is_none() {
            self.error = Some("Enter a custom topic first".to_string());
            self.focus = SetupField::CustomTopic;
            return false;
        }
        self.error = None;
        self.generating = true;
        true
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Runs the pending generation request, if any.
    ///
    /// Blocks the UI until the service answers. A failure is kept for the
    /// setup screen and the game stays idle.
    pub async fn generate(&mut self) {
        if !self.generating {
            return;
        }
        let Some(topic) = self.topic() else {
            self.generating = false;
            return;
        };

        let result = self
            .controller
            .start(&topic, self.difficulty, self.count.get())
            .await;
        self.generating = false;
        self.selected_option = 0;
        self.result_scroll = 0;

        if let Err(e) = result {
            warn!(error = %e, "Could not start game");
            self.error = Some(format!("Could not generate questions. {}", e));
        }
    }

    // Quiz screen

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.options.len())
    }

    pub fn select_next_option(&mut self) {
        if self.phase() != GamePhase::AwaitingAnswer {
            return;
        }
        let count = self.option_count().max(1);
        self.selected_option = (self.selected_option + 1) % count;
    }

    pub fn select_previous_option(&mut self) {
        if self.phase() != GamePhase::AwaitingAnswer {
            return;
        }
        let count = self.option_count().max(1);
        self.selected_option = (self.selected_option + count - 1) % count;
    }

    pub fn submit_answer(&mut self) {
        let choice = self
            .current_question()
            .and_then(|q| q.options.get(self.selected_option))
            .cloned()
            .unwrap_or_default();
        if let Err(e) = self.controller.submit(&choice) {
            debug!(error = %e, "Submit ignored");
        }
    }

    pub fn next_question(&mut self) {
        match self.controller.next() {
            Ok(_) => self.selected_option = 0,
            Err(e) => debug!(error = %e, "Next ignored"),
        }
    }

    // Result screen

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.total_questions().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Returns to the setup screen, keeping the previous choices.
    pub fn play_again(&mut self) {
        if let Err(e) = self.controller.play_again() {
            debug!(error = %e, "Play again ignored");
            return;
        }
        self.selected_option = 0;
        self.result_scroll = 0;
        self.focus = SetupField::Start;
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::generator::QuestionGenerator;
    use crate::llm_client::{CompletionService, LlmError};

    struct Fixed(&'static str);

    #[async_trait]
    impl CompletionService for Fixed {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn app(reply: &'static str) -> App {
        App::new(GameController::new(QuestionGenerator::new(Box::new(Fixed(reply)))))
    }

    const ONE_SHORT: &str = r#"[
        {"question": "Pick one", "options": ["Yes", "No"], "correct": "No"},
        {"question": "Again", "options": ["Up", "Down", "Left", "Right"], "correct": "d"},
        {"question": "Last", "options": [], "correct": 0}
    ]"#;

    #[test]
    fn test_setup_prefill() {
        let preset = app("[]").with_setup(Some("science"), Some(Difficulty::Hard), Some(42));
        assert_eq!(preset.topic().as_deref(), Some("Science"));
        assert_eq!(preset.difficulty(), Difficulty::Hard);
        assert_eq!(preset.count().get(), 10);

        let custom = app("[]").with_setup(Some("  Rust lifetimes "), None, None);
        assert!(custom.is_custom_topic());
        assert_eq!(custom.topic().as_deref(), Some("Rust lifetimes"));
    }

    #[test]
    fn test_blank_custom_topic_blocks_start() {
        let mut app = app("[]");
        app.adjust_focused(false);
        assert!(app.is_custom_topic());
        assert!(!app.request_start());
        assert_eq!(app.focus(), SetupField::CustomTopic);
        assert!(app.error().is_some());

        for c in "Jazz".chars() {
            app.custom_topic_push(c);
        }
        assert!(app.request_start());
        assert_eq!(app.state(), AppState::Generating);
    }

    #[test]
    fn test_focus_skips_hidden_custom_field() {
        let mut app = app("[]");
        app.focus_next();
        assert_eq!(app.focus(), SetupField::Difficulty);
        app.focus_previous();
        app.adjust_focused(false);
        app.focus_next();
        assert_eq!(app.focus(), SetupField::CustomTopic);
    }

    #[tokio::test]
    async fn test_generation_failure_returns_to_setup() {
        let mut app = app("not json at all");
        assert!(app.request_start());
        app.generate().await;
        assert_eq!(app.state(), AppState::Setup);
        assert!(app.error().is_some_and(|e| e.contains("invalid JSON")));
        assert!(app.session().is_none());
    }

    #[tokio::test]
    async fn test_short_questions_are_playable() {
        let mut app = app(ONE_SHORT);
        app.request_start();
        app.generate().await;
        assert_eq!(app.state(), AppState::Quiz);

        app.select_next_option();
        app.select_next_option();
        assert_eq!(app.selected_option(), 0);
        app.select_next_option();
        app.submit_answer();
        assert_eq!(app.score(), 1);
        app.next_question();

        app.select_previous_option();
        app.select_previous_option();
        assert_eq!(app.selected_option(), 2);
        app.submit_answer();
        assert_eq!(app.score(), 1);
        app.next_question();

        // No options at all: submits an empty answer, graded wrong.
        app.submit_answer();
        assert_eq!(app.feedback().map(|f| f.correct), Some(false));
        app.next_question();
        assert_eq!(app.state(), AppState::Result);
        assert_eq!(app.score(), 1);

        app.play_again();
        assert_eq!(app.state(), AppState::Setup);
    }
}
