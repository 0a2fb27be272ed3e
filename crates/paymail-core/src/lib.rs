//! Core library for payment detail extraction from email text.
//!
//! This crate provides:
//! - Rule-based extraction of amount, due date, brand, status and currency
//! - Confidence scoring of heuristic results
//! - Interpretation of LLM extractor replies and the precedence rule that
//!   picks between an LLM result and the heuristic one

pub mod error;
pub mod extraction;
pub mod models;

pub use error::{LlmError, PaymailError, Result};
pub use extraction::{
    extract_payment_details, resolve_payment, HeuristicParser, PaymentExtractor, PaymentSource,
    ResolvedPayment,
};
pub use models::config::PaymailConfig;
pub use models::payment::{ParseEmailRequest, ParseEmailResponse, ParsedPayment, PaymentStatus};
