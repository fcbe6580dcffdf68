use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One multiple-choice trivia question as produced by the generator.
///
/// Every field is optional on the wire. A question with missing pieces is
/// still kept; grading simply treats whatever cannot be resolved as wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Question {
    #[serde(rename = "question", default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: Vec<String>,
    #[serde(
        rename = "correct",
        alias = "correct_answer",
        alias = "answer",
        default,
        deserialize_with = "lenient_key"
    )]
    pub correct_key: Option<CorrectKey>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub explanation: String,
}

impl Question {
    pub fn new(text: impl Into<String>, options: Vec<String>, correct_key: CorrectKey) -> Self {
        Self {
            text: text.into(),
            options,
            correct_key: Some(correct_key),
            explanation: String::new(),
        }
    }

    /// Questions with fewer than four options cannot be graded by letter.
    pub fn is_complete(&self) -> bool {
        self.options.len() == 4 && self.correct_key.is_some()
    }
}

/// Which option the model says is correct.
///
/// Models answer with an index, a letter or the option text more or less
/// interchangeably, so the key is classified once when it is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectKey {
    /// Zero-based option index. Not bounds-checked.
    Index(i64),
    /// `A` to `D`, always stored upper-case.
    Letter(char),
    /// Text meant to equal one of the options.
    Text(String),
}

impl CorrectKey {
    /// Classifies a textual key: a lone letter A-D becomes `Letter`,
    /// anything else stays `Text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut chars = text.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if matches!(c.to_ascii_uppercase(), 'A'..='D') => {
                Self::Letter(c.to_ascii_uppercase())
            }
            _ => Self::Text(text),
        }
    }

    /// Classifies a JSON key. Integral numbers (`2` or `2.0`) are indices,
    /// strings go through [`CorrectKey::from_text`], anything else is no key.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Some(match number.as_i64() {
                Some(index) => Self::Index(index),
                None => match number.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                        Self::Index(f as i64)
                    }
                    _ => Self::Text(number.to_string()),
                },
            }),
            Value::String(text) => Some(Self::from_text(text.as_str())),
            _ => None,
        }
    }

    /// Option index a letter stands for.
    pub fn letter_index(letter: char) -> Option<usize> {
        match letter.to_ascii_uppercase() {
            'A' => Some(0),
            'B' => Some(1),
            'C' => Some(2),
            'D' => Some(3),
            _ => None,
        }
    }
}

// Models write `null`, numbers and the odd boolean where strings belong.
// Those fields degrade to empty text instead of failing the question.

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).unwrap_or_default())
}

/// Keeps option positions stable: an unreadable option becomes empty text.
fn lenient_options<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .iter()
            .map(|item| scalar_text(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<CorrectKey>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(CorrectKey::from_json(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_classification() {
        assert_eq!(CorrectKey::from_text("b"), CorrectKey::Letter('B'));
        assert_eq!(CorrectKey::from_text(" D "), CorrectKey::Letter('D'));
        assert_eq!(CorrectKey::from_text("E"), CorrectKey::Text("E".to_string()));
        assert_eq!(
            CorrectKey::from_text("Paris"),
            CorrectKey::Text("Paris".to_string())
        );
    }

    #[test]
    fn test_question_deserialization() {
        let json = r#"{
            "question": "Capital of France?",
            "options": ["Paris", "London", "Rome", "Berlin"],
            "correct": 0,
            "explanation": "Paris has been the capital since 987."
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.text, "Capital of France?");
        assert_eq!(question.correct_key, Some(CorrectKey::Index(0)));
        assert!(question.is_complete());
    }

    #[test]
    fn test_missing_fields_are_tolerated() {
        let question: Question =
            serde_json::from_str(r#"{"question": "Odd one", "options": ["x", "y"]}"#).unwrap();
        assert_eq!(question.correct_key, None);
        assert!(question.explanation.is_empty());
        assert!(!question.is_complete());
    }

    #[test]
    fn test_null_and_numeric_fields() {
        let question: Question = serde_json::from_str(
            r#"{"question": "2 + 2?", "options": [3, 4, 5, 22], "correct": 1.0, "explanation": null}"#,
        )
        .unwrap();
        assert_eq!(question.options, vec!["3", "4", "5", "22"]);
        assert_eq!(question.correct_key, Some(CorrectKey::Index(1)));
        assert!(question.explanation.is_empty());
        assert!(question.is_complete());
    }

    #[test]
    fn test_unusable_key_values() {
        assert_eq!(CorrectKey::from_json(&serde_json::json!(null)), None);
        assert_eq!(CorrectKey::from_json(&serde_json::json!(true)), None);
        assert_eq!(CorrectKey::from_json(&serde_json::json!([0])), None);
        assert_eq!(
            CorrectKey::from_json(&serde_json::json!(1.5)),
            Some(CorrectKey::Text("1.5".to_string()))
        );
        assert_eq!(
            CorrectKey::from_json(&serde_json::json!(-1)),
            Some(CorrectKey::Index(-1))
        );

        let question: Question =
            serde_json::from_str(r#"{"question": null, "options": {"a": 1}, "correct": null}"#)
                .unwrap();
        assert!(question.text.is_empty());
        assert!(question.options.is_empty());
        assert_eq!(question.correct_key, None);
    }

    #[test]
    fn test_correct_answer_alias() {
        let question: Question =
            serde_json::from_str(r#"{"question": "q", "correct_answer": "c"}"#).unwrap();
        assert_eq!(question.correct_key, Some(CorrectKey::Letter('C')));
    }
}
