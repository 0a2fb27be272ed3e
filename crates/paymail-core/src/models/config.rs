//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PaymailError, Result};

/// Main configuration for paymail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymailConfig {
    /// Extraction and precedence settings.
    pub extraction: ExtractionConfig,

    /// Probabilistic (LLM) extractor settings.
    pub llm: LlmConfig,
}

/// Extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// LLM results at or above this confidence are used without
    /// consulting the heuristic extractor.
    pub preference_threshold: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            preference_threshold: 0.98,
        }
    }
}

/// LLM extractor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Try the LLM extractor before the heuristic one.
    pub enabled: bool,

    /// OpenAI-compatible chat completions endpoint.
    pub endpoint: String,

    /// Model name sent with each request.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Environment variables checked, in order, for the API key.
    pub api_key_env: Vec<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.2,
            api_key_env: vec!["GROQ_API_KEY".to_string(), "OPENAI_API_KEY".to_string()],
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// First non-empty API key among the configured environment variables.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| !key.trim().is_empty())
    }
}

impl PaymailConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| PaymailError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PaymailError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.extraction.preference_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PaymailError::Config(format!(
                "extraction.preference_threshold must be within 0..=1, got {}",
                threshold
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(PaymailError::Config(
                "llm.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PaymailConfig =
            serde_json::from_str(r#"{ "llm": { "enabled": true } }"#).unwrap();

        assert!(config.llm.enabled);
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.extraction.preference_threshold, 0.98);
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = PaymailConfig::default();
        assert!(config.validate().is_ok());

        config.extraction.preference_threshold = 1.5;
        assert!(matches!(config.validate(), Err(PaymailError::Config(_))));
    }

    #[test]
    fn test_api_key_skips_unset_variables() {
        let config = LlmConfig {
            api_key_env: vec!["PAYMAIL_TEST_SURELY_UNSET_KEY".to_string()],
            ..Default::default()
        };

        assert_eq!(config.api_key(), None);
    }
}
