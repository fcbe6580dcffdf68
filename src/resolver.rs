//! Answer grading.
//!
//! The generator asks for the correct option verbatim, but models still
//! answer with an index or a letter now and then. Grading therefore works
//! out an option index from whatever key arrived and compares indices,
//! falling back to plain text comparison only when no index can be found.

use crate::models::{CorrectKey, Question};

/// Returns whether `submitted` is the right answer to `question`.
///
/// Pure: the same inputs always give the same result. Anything that cannot
/// be resolved grades as wrong rather than failing.
pub fn resolve(question: &Question, submitted: &str) -> bool {
    let Some(key) = &question.correct_key else {
        return false;
    };

    let correct = correct_index(question);
    let selected = option_position(&question.options, submitted).map(|i| i as i64);

    match (correct, selected) {
        (Some(correct), Some(selected)) => correct == selected,
        (Some(_), None) => false,
        (None, _) => match key {
            CorrectKey::Text(text) => same_text(submitted, text),
            CorrectKey::Index(_) | CorrectKey::Letter(_) => false,
        },
    }
}

/// Index the key points at, if it can be determined.
///
/// Integer keys are taken as-is, so the result may lie outside `options`.
pub fn correct_index(question: &Question) -> Option<i64> {
    match question.correct_key.as_ref()? {
        CorrectKey::Index(index) => Some(*index),
        CorrectKey::Letter(letter) => CorrectKey::letter_index(*letter).map(|i| i as i64),
        CorrectKey::Text(text) => option_position(&question.options, text).map(|i| i as i64),
    }
}

/// Text to reveal as the right answer after a wrong submission.
pub fn correct_answer_text(question: &Question) -> Option<&str> {
    let from_index = correct_index(question)
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| question.options.get(i))
        .map(|option| option.trim());

    from_index.or_else(|| match question.correct_key.as_ref()? {
        CorrectKey::Text(text) => Some(text.trim()),
        _ => None,
    })
}

fn option_position(options: &[String], text: &str) -> Option<usize> {
    options.iter().position(|option| same_text(option, text))
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
