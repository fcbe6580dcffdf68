//! Live generation against the configured service.

use ai_trivia::{Difficulty, LlmClient, QuestionGenerator, Settings};

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_generation() {
    dotenvy::dotenv().ok();

    let settings = Settings::default();
    let config = settings.llm_config().expect("API key not set");
    let generator = QuestionGenerator::new(Box::new(LlmClient::new(config)));

    let questions = generator
        .try_generate("General Knowledge", Difficulty::Easy, 3)
        .await
        .expect("Failed to generate");

    assert!(!questions.is_empty());
    for question in &questions {
        eprintln!("{} {:?} -> {:?}", question.text, question.options, question.correct_key);
    }
}
