//! Question-set generation.
//!
//! One prompt, one request, one parse. A response that is not a JSON batch
//! fails the attempt; a single unreadable question is dropped on its own.
//! There is no retry and nothing is cached between attempts.

use derive_more::{Display, Error, From};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::llm_client::{CompletionService, LlmError};
use crate::models::{Difficulty, Question, QuestionCount};

/// Why a generation attempt produced no questions.
#[derive(Debug, Display, Error, From)]
pub enum GenerationError {
    #[display("Question count {} is outside {}..={}", count, QuestionCount::MIN, QuestionCount::MAX)]
    InvalidCount { count: usize },
    #[display("Generation service failed: {_0}")]
    #[from]
    Service(LlmError),
    #[display("Model returned invalid JSON: {message}")]
    Parse { message: String },
    #[display("Model returned no questions")]
    NoQuestions,
}

/// Builds question sets by asking a [`CompletionService`].
pub struct QuestionGenerator {
    service: Box<dyn CompletionService>,
}

impl QuestionGenerator {
    pub fn new(service: Box<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// Generates `count` questions, returning an empty list on any failure.
    pub async fn generate(&self, topic: &str, difficulty: Difficulty, count: usize) -> Vec<Question> {
        self.try_generate(topic, difficulty, count)
            .await
            .unwrap_or_default()
    }

    /// Generates `count` questions, keeping the reason for a failure.
    #[instrument(skip(self))]
    pub async fn try_generate(
        &self,
        topic: &str,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>, GenerationError> {
        let count = QuestionCount::new(count).ok_or(GenerationError::InvalidCount { count })?;

        let prompt = build_prompt(topic, difficulty, count);
        debug!(prompt_length = prompt.len(), "Requesting questions");
        let raw = self.service.complete(&prompt).await.inspect_err(|e| {
            warn!(error = %e, "Generation request failed");
        })?;

        let mut questions = parse_questions(&raw).inspect_err(|e| {
            warn!(error = %e, "Discarding generation response");
        })?;

        if questions.len() > count.get() {
            debug!(received = questions.len(), "Truncating surplus questions");
            questions.truncate(count.get());
        } else if questions.len() < count.get() {
            warn!(
                received = questions.len(),
                requested = count.get(),
                "Model returned fewer questions than requested"
            );
        }

        let incomplete = questions.iter().filter(|q| !q.is_complete()).count();
        if incomplete > 0 {
            warn!(incomplete, "Some questions are missing options or an answer key");
        }

        info!(questions = questions.len(), "Generated question set");
        Ok(questions)
    }
}

/// Instruction sent to the model for one game.
pub fn build_prompt(topic: &str, difficulty: Difficulty, count: QuestionCount) -> String {
    format!(
        r#"Generate exactly {count} multiple-choice trivia questions about '{topic}'.
Difficulty: {difficulty}.

OUTPUT RULES:
- Output ONLY a JSON array, with no commentary before or after it.
- Every question has exactly 4 plausible options.
- Options are full answers, never bare letters such as "A" or "B".
- "correct" must repeat one of the options verbatim.
- Each question must follow the EXACT structure below.
- FORMAT:
[
  {{
    "question": "string",
    "options": ["option1", "option2", "option3", "option4"],
    "correct": "one of the options",
    "explanation": "short explanation"
  }}
]"#,
        count = count.get(),
    )
}

/// Removes a surrounding markdown code fence, if there is one.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) on the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end().trim_end_matches("```").trim()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Batch {
    List(Vec<Value>),
    Wrapped { questions: Vec<Value> },
}

/// Parses model output into questions.
///
/// Only the outer shape is strict. Each element is decoded on its own, so
/// a question with odd field types degrades instead of failing the batch,
/// and an element that is not a question object at all is skipped.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, GenerationError> {
    let cleaned = strip_code_fence(raw);
    let batch: Batch = serde_json::from_str(cleaned).map_err(|e| GenerationError::Parse {
        message: format!("expected a JSON array of questions: {}", e),
    })?;

    let items = match batch {
        Batch::List(items) | Batch::Wrapped { questions: items } => items,
    };
    let questions: Vec<Question> = items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item) {
            Ok(question) => Some(question),
            Err(e) => {
                warn!(position, error = %e, "Skipping unreadable question");
                None
            }
        })
        .collect();

    if questions.is_empty() {
        return Err(GenerationError::NoQuestions);
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorrectKey;

    const TWO_QUESTIONS: &str = r#"[
        {"question": "2 + 2?", "options": ["3", "4", "5", "22"], "correct": "4", "explanation": "Basic sums."},
        {"question": "Largest planet?", "options": ["Mars", "Venus", "Jupiter", "Earth"], "correct": 2, "explanation": "Jupiter."}
    ]"#;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```\n"), "[1]");
        assert_eq!(strip_code_fence("  ```JSON\n[1]```"), "[1]");
        assert_eq!(strip_code_fence("```json[1]```"), "[1]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
    }

    #[test]
    fn test_parse_questions() {
        let questions = parse_questions(TWO_QUESTIONS).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_key, Some(CorrectKey::Text("4".to_string())));
        assert_eq!(questions[1].correct_key, Some(CorrectKey::Index(2)));
        assert_eq!(questions[1].options.len(), 4);
    }

    #[test]
    fn test_parse_fenced_and_wrapped() {
        let fenced = format!("```json\n{}\n```", TWO_QUESTIONS);
        assert_eq!(parse_questions(&fenced).unwrap().len(), 2);

        let wrapped = format!(r#"{{"questions": {}}}"#, TWO_QUESTIONS);
        assert_eq!(parse_questions(&wrapped).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_questions("Sorry, I can't do that."),
            Err(GenerationError::Parse { .. })
        ));
        assert!(matches!(
            parse_questions(r#"[{"question": "cut off", "options": ["#),
            Err(GenerationError::Parse { .. })
        ));
        assert!(matches!(parse_questions("[]"), Err(GenerationError::NoQuestions)));
    }

    const GOOD: &str = r#"{"question": "Capital of Italy?", "options": ["Rome", "Milan", "Turin", "Naples"], "correct": "Rome", "explanation": "Since 1871."}"#;

    #[test]
    fn test_odd_field_types_keep_the_batch() {
        let null_explanation = r#"{"question": "2 + 2?", "options": ["3", "4", "5", "22"], "correct": "4", "explanation": null}"#;
        let numeric_options = r#"{"question": "2 + 2?", "options": [3, 4, 5, 22], "correct": "4"}"#;
        let float_key = r#"{"question": "2 + 2?", "options": ["3", "4", "5", "22"], "correct": 1.0}"#;

        for odd in [null_explanation, numeric_options, float_key] {
            let questions = parse_questions(&format!("[{}, {}]", GOOD, odd)).unwrap();
            assert_eq!(questions.len(), 2, "batch with {}", odd);
            assert_eq!(questions[0].text, "Capital of Italy?");
            assert_eq!(questions[1].options, vec!["3", "4", "5", "22"]);
            assert!(crate::resolver::resolve(&questions[1], "4"), "grading {}", odd);
        }
    }

    #[test]
    fn test_non_object_elements_are_skipped() {
        let questions = parse_questions(&format!(r#"[{}, "oops", 7, null]"#, GOOD)).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_key, Some(CorrectKey::Text("Rome".to_string())));

        assert!(matches!(
            parse_questions(r#"["oops", 7]"#),
            Err(GenerationError::NoQuestions)
        ));
        assert!(matches!(
            parse_questions(r#"{"questions": "none"}"#),
            Err(GenerationError::Parse { .. })
        ));
    }

    #[test]
    fn test_prompt_mentions_parameters() {
        let count = QuestionCount::new(7).unwrap();
        let prompt = build_prompt("Volcanoes", Difficulty::Hard, count);
        assert!(prompt.contains("exactly 7"));
        assert!(prompt.contains("'Volcanoes'"));
        assert!(prompt.contains("Difficulty: Hard"));
        assert!(prompt.contains("\"correct\""));
        assert!(prompt.contains("JSON array"));
    }
}
