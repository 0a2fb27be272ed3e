//! Payment detail extraction module.

pub mod llm;
mod parser;
pub mod resolve;
pub mod rules;

pub use parser::{extract_payment_details, heuristic_confidence, HeuristicParser};
pub use resolve::{resolve_payment, resolve_with, PaymentSource, ResolvedPayment};

use crate::models::payment::ParsedPayment;

/// Trait for payment extractors that cannot fail.
pub trait PaymentExtractor {
    /// Extract payment details from raw email text.
    fn extract(&self, text: &str) -> ParsedPayment;
}
