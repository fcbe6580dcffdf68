//! State of one playthrough.

use crate::models::Question;
use crate::resolver;

/// Grading outcome for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub submitted: String,
    /// What to reveal as the right answer, when it can be determined.
    pub correct_answer: Option<String>,
    /// Only present for wrong answers.
    pub explanation: Option<String>,
}

/// One graded question, kept for the results breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub submitted: String,
    pub correct: bool,
}

/// Questions, cursor, score and the answered flag for one game.
///
/// `cursor` and `score` only ever grow and `cursor == questions.len()` means
/// the game is over. Outside a graded question `score <= cursor`; a correct
/// answer counts as soon as it is graded, one step before the cursor moves.
#[derive(Debug, Clone)]
pub struct GameSession {
    questions: Vec<Question>,
    cursor: usize,
    score: usize,
    answered: bool,
    feedback: Option<Feedback>,
    history: Vec<AnswerRecord>,
}

impl GameSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            cursor: 0,
            score: 0,
            answered: false,
            feedback: None,
            history: Vec::new(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn answered(&self) -> bool {
        self.answered
    }

    pub fn is_over(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    /// Grades `choice` against the current question. Callers check that the
    /// question exists and has not been answered yet.
    pub(super) fn grade(&mut self, choice: &str) -> Option<&Feedback> {
        let question = self.questions.get(self.cursor)?;
        let correct = resolver::resolve(question, choice);

        let feedback = Feedback {
            correct,
            submitted: choice.to_string(),
            correct_answer: resolver::correct_answer_text(question).map(str::to_string),
            explanation: (!correct && !question.explanation.trim().is_empty())
                .then(|| question.explanation.clone()),
        };

        if correct {
            self.score += 1;
        }
        self.answered = true;
        self.history.push(AnswerRecord {
            question_index: self.cursor,
            submitted: choice.to_string(),
            correct,
        });
        self.feedback = Some(feedback);
        self.feedback.as_ref()
    }

    pub(super) fn advance(&mut self) {
        self.cursor = (self.cursor + 1).min(self.questions.len());
        self.answered = false;
        self.feedback = None;
    }
}
