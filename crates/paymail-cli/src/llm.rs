//! HTTP client for the LLM (probabilistic) extractor.

use std::time::Duration;

use tracing::{debug, warn};

use paymail_core::extraction::llm::{ChatCompletionRequest, ChatCompletionResponse};
use paymail_core::models::config::LlmConfig;
use paymail_core::{LlmError, ParsedPayment};

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: String,
}

impl LlmClient {
    /// Create a client, reading the API key from the environment.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| LlmError::MissingApiKey(config.api_key_env.join(", ")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    /// Ask the model for the payment details of one email.
    pub async fn extract(&self, email_text: &str) -> Result<ParsedPayment, LlmError> {
        let request = ChatCompletionRequest::for_email(
            &self.config.model,
            self.config.temperature,
            email_text,
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LlmError::Http(format!("HTTP {}", response.status())));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedReply(e.to_string()))?;

        body.into_payment()
    }
}

/// Build a client when the LLM extractor is requested. A missing key is
/// not an error: extraction falls back to heuristics.
pub fn client_if_enabled(config: &LlmConfig, requested: bool) -> Option<LlmClient> {
    if !(requested || config.enabled) {
        return None;
    }

    match LlmClient::from_config(config) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("LLM extractor unavailable: {}", e);
            None
        }
    }
}

/// LLM result for one email, or `None` on any failure.
pub async fn try_extract(client: Option<&LlmClient>, email_text: &str) -> Option<ParsedPayment> {
    let client = client?;

    match client.extract(email_text).await {
        Ok(payment) => {
            debug!("LLM result with confidence {:.2}", payment.confidence);
            Some(payment)
        }
        Err(e) => {
            warn!("LLM extraction failed, using heuristics: {}", e);
            None
        }
    }
}
