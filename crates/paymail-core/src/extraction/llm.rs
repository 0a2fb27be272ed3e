//! Request and reply handling for a probabilistic (LLM) extractor.
//!
//! Only the wire shapes and reply interpretation live here; the HTTP
//! transport belongs to the caller.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::LlmError;
use crate::models::payment::{ParsedPayment, PaymentStatus};

/// Instruction sent as the system message.
pub const SYSTEM_PROMPT: &str = "Extract payment details from the email and return ONLY a compact JSON object with keys: brand (string), amount (number), currency (string), dueDate (YYYY-MM-DD), status (string). Use numeric amount without commas; infer currency if missing.";

/// Confidence by number of found fields among amount, due date and brand,
/// when amount and due date are not both present.
const PARTIAL_CONFIDENCE: [f64; 4] = [0.7, 0.8, 0.9, 0.95];

/// Confidence when both amount and due date are present.
const COMPLETE_CONFIDENCE: f64 = 0.99;

/// OpenAI-compatible chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatCompletionRequest {
    /// Build an extraction request for one email.
    pub fn for_email(model: &str, temperature: f32, email_text: &str) -> Self {
        Self {
            model: model.to_string(),
            temperature,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: email_text.to_string(),
                },
            ],
        }
    }
}

/// OpenAI-compatible chat completion response (only the fields we read).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ReplyMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice.
    pub fn content(&self) -> Result<&str, LlmError> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyReply)
    }

    /// Interpret the first choice as payment details.
    pub fn into_payment(self) -> Result<ParsedPayment, LlmError> {
        parse_llm_reply(self.content()?)
    }
}

/// Interpret the model's message content as payment details.
///
/// Fields that are missing, empty or of the wrong shape are dropped rather
/// than failing the whole reply. A surrounding Markdown code fence is
/// tolerated.
pub fn parse_llm_reply(content: &str) -> Result<ParsedPayment, LlmError> {
    let value: Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| LlmError::MalformedReply(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(LlmError::MalformedReply("expected a JSON object".to_string()));
    };

    let mut payment = ParsedPayment {
        brand: string_field(&fields, "brand"),
        amount: fields.get("amount").and_then(amount_value),
        currency: string_field(&fields, "currency").map(|c| c.to_uppercase()),
        due_date: string_field(&fields, "dueDate")
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        status: string_field(&fields, "status").and_then(|s| PaymentStatus::from_label(&s)),
        confidence: 0.0,
    };
    payment.confidence = llm_confidence(&payment);

    Ok(payment)
}

/// Confidence assigned to an LLM result.
pub fn llm_confidence(payment: &ParsedPayment) -> f64 {
    if payment.amount.is_some() && payment.due_date.is_some() {
        return COMPLETE_CONFIDENCE;
    }

    let found = [
        payment.amount.is_some(),
        payment.due_date.is_some(),
        payment.brand.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count();

    PARTIAL_CONFIDENCE[found.min(PARTIAL_CONFIDENCE.len() - 1)]
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn amount_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.replace([',', '$'], "").trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .filter(|amount| !amount.is_sign_negative())
}
