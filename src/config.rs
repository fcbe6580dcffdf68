//! Generation service settings.
//!
//! Settings come from an optional TOML file; the API key always comes from
//! the environment (a `.env` file is loaded first by the binary). A missing
//! key is reported before the terminal UI starts.

use std::path::Path;

use derive_more::{Display, Error};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::llm_client::{LlmConfig, LlmProvider};

/// Settings file contents. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub provider: LlmProvider,
    /// Falls back to the provider's default model.
    pub model: Option<String>,
    pub max_tokens: u32,
    /// Base URL for OpenAI-compatible servers. Rejected for Anthropic.
    pub api_base: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            max_tokens: 2048,
            api_base: None,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, or returns the defaults when there is none.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("No settings file, using defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let settings = Self::from_toml(&content)?;
        info!(path = %path.display(), provider = ?settings.provider, "Settings loaded");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Builds the client configuration, taking the API key from the process
    /// environment.
    pub fn llm_config(&self) -> Result<LlmConfig, ConfigError> {
        self.llm_config_with(|name| std::env::var(name).ok())
    }

    /// Like [`Settings::llm_config`], with `lookup` standing in for the
    /// environment.
    pub fn llm_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<LlmConfig, ConfigError> {
        let var = self.provider.api_key_var();
        let api_key = lookup(var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::new(format!("{} environment variable not set", var)))?;

        let config = LlmConfig::new(
            self.provider,
            api_key,
            self.model().to_string(),
            self.max_tokens,
        );
        match (&self.api_base, self.provider) {
            (None, _) => Ok(config),
            (Some(base), LlmProvider::OpenAI) => Ok(config.with_api_base(base.as_str())),
            (Some(_), LlmProvider::Anthropic) => Err(ConfigError::new(
                "api_base only applies to provider \"openai\"".to_string(),
            )),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model(), "gpt-4o-mini");
        assert_eq!(settings.max_tokens, 2048);
    }

    #[test]
    fn test_parse_settings_file() {
        let settings = Settings::from_toml(
            r#"
            provider = "anthropic"
            model = "claude-3-5-sonnet-latest"
            max_tokens = 4000
            "#,
        )
        .unwrap();
        assert_eq!(settings.provider, LlmProvider::Anthropic);
        assert_eq!(settings.model(), "claude-3-5-sonnet-latest");
        assert_eq!(settings.max_tokens, 4000);

        assert!(Settings::from_toml(r#"provider = "mystery""#).is_err());
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let settings = Settings::default();
        let err = settings.llm_config_with(|_| None).unwrap_err();
        assert!(err.message.contains("OPENAI_API_KEY"));

        assert!(settings.llm_config_with(|_| Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_key_follows_provider() {
        let settings = Settings {
            provider: LlmProvider::Anthropic,
            ..Settings::default()
        };
        let config = settings
            .llm_config_with(|name| (name == "ANTHROPIC_API_KEY").then(|| "sk-test".to_string()))
            .unwrap();
        assert_eq!(config.provider(), LlmProvider::Anthropic);
        assert_eq!(config.model(), "claude-3-5-haiku-20241022");
        assert!(settings.llm_config_with(|_| None).is_err());
    }

    #[test]
    fn test_api_base_needs_openai() {
        let key = |_: &str| Some("sk-test".to_string());
        let openai = Settings {
            api_base: Some("http://localhost:1234/v1/".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            openai.llm_config_with(key).unwrap().api_base(),
            "http://localhost:1234/v1"
        );

        let anthropic = Settings {
            provider: LlmProvider::Anthropic,
            ..openai
        };
        let err = anthropic.llm_config_with(key).unwrap_err();
        assert!(err.message.contains("api_base"));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.message.contains("Failed to read"));
    }
}
