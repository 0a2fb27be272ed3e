//! Heuristic payment parser combining the rule-based field extractors.

use tracing::debug;

use crate::models::payment::ParsedPayment;

use super::rules::{
    detect_currency, extract_amount, extract_brand, extract_due_date, extract_status,
    normalize_text,
};
use super::PaymentExtractor;

/// Confidence by number of scored fields found (0 - 4). Capped below 1.0:
/// the heuristic is never certain.
const CONFIDENCE_BY_FIELDS: [f64; 5] = [0.6, 0.7, 0.8, 0.9, 0.99];

/// Rule-based payment parser. Stateless and cheap to construct.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicParser;

impl HeuristicParser {
    /// Create a new heuristic parser.
    pub fn new() -> Self {
        Self
    }
}

impl PaymentExtractor for HeuristicParser {
    fn extract(&self, raw: &str) -> ParsedPayment {
        let text = normalize_text(raw);

        let mut payment = ParsedPayment {
            amount: extract_amount(&text),
            due_date: extract_due_date(&text),
            brand: extract_brand(&text),
            status: extract_status(&text),
            currency: detect_currency(&text),
            confidence: 0.0,
        };
        payment.confidence = heuristic_confidence(payment.scored_fields());

        debug!(
            "Extracted {} of 4 scored fields from {} characters, missing {:?}",
            payment.scored_fields(),
            raw.len(),
            payment.missing_fields()
        );

        payment
    }
}

/// Heuristic confidence for a number of found fields:
/// `min(0.99, 0.6 + 0.1 * found)`.
pub fn heuristic_confidence(found: usize) -> f64 {
    CONFIDENCE_BY_FIELDS[found.min(CONFIDENCE_BY_FIELDS.len() - 1)]
}

/// Extract payment details from raw email text.
pub fn extract_payment_details(raw: &str) -> ParsedPayment {
    HeuristicParser::new().extract(raw)
}
