//! Error types for the paymail-core library.
//!
//! Heuristic extraction itself never fails. `PaymailError` covers
//! configuration handling; `LlmError` covers the probabilistic (LLM)
//! extractor, whose failures callers turn into an absent result.

use thiserror::Error;

/// Main error type for the paymail library.
#[derive(Error, Debug)]
pub enum PaymailError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while talking to or interpreting an LLM extractor.
///
/// Callers treat every variant as "no probabilistic result" and fall back
/// to the heuristic extractor.
#[derive(Error, Debug)]
pub enum LlmError {
    /// None of the configured API key variables is set.
    #[error("no API key found in {0}")]
    MissingApiKey(String),

    /// Transport or HTTP status failure.
    #[error("request failed: {0}")]
    Http(String),

    /// The reply content is not a JSON object.
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// The reply carried no message content.
    #[error("reply has no content")]
    EmptyReply,
}

/// Result type for the paymail library.
pub type Result<T> = std::result::Result<T, PaymailError>;
