//! Precedence between a probabilistic (LLM) result and the heuristic one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::payment::ParsedPayment;

use super::parser::HeuristicParser;
use super::PaymentExtractor;

/// Default confidence at which an LLM result is trusted outright.
pub const DEFAULT_PREFERENCE_THRESHOLD: f64 = 0.98;

/// Which extractor produced the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSource {
    Heuristic,
    Probabilistic,
}

/// Final payment details and where they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPayment {
    pub payment: ParsedPayment,
    pub source: PaymentSource,
}

/// Choose between an optional LLM result and the heuristic extractor.
///
/// An LLM result at or above `threshold` is returned untouched. Otherwise
/// the heuristic runs and wins when the LLM result is absent or strictly
/// less confident. Any LLM failure must be passed in as `None`.
pub fn resolve_payment(
    probabilistic: Option<ParsedPayment>,
    text: &str,
    threshold: f64,
) -> ResolvedPayment {
    resolve_with(&HeuristicParser::new(), probabilistic, text, threshold)
}

/// [`resolve_payment`] with a caller-supplied fallback extractor.
pub fn resolve_with<E: PaymentExtractor + ?Sized>(
    fallback: &E,
    probabilistic: Option<ParsedPayment>,
    text: &str,
    threshold: f64,
) -> ResolvedPayment {
    match probabilistic {
        Some(llm) if llm.confidence >= threshold => {
            debug!("Using LLM result with confidence {:.2}", llm.confidence);
            ResolvedPayment {
                payment: llm,
                source: PaymentSource::Probabilistic,
            }
        }
        Some(llm) => {
            let heuristic = fallback.extract(text);
            if heuristic.confidence > llm.confidence {
                debug!(
                    "Heuristic confidence {:.2} beats LLM confidence {:.2}",
                    heuristic.confidence, llm.confidence
                );
                ResolvedPayment {
                    payment: heuristic,
                    source: PaymentSource::Heuristic,
                }
            } else {
                ResolvedPayment {
                    payment: llm,
                    source: PaymentSource::Probabilistic,
                }
            }
        }
        None => {
            debug!("No LLM result, using heuristic extractor");
            ResolvedPayment {
                payment: fallback.extract(text),
                source: PaymentSource::Heuristic,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const FULL_EMAIL: &str =
        "Client: Acme Corp\nAmount: $500.00\nDue Date: April 1, 2025\nStatus: pending";

    fn llm_result(confidence: f64) -> ParsedPayment {
        ParsedPayment {
            brand: Some("From LLM".to_string()),
            confidence,
            ..Default::default()
        }
    }

    struct CountingExtractor {
        calls: Cell<usize>,
    }

    impl PaymentExtractor for CountingExtractor {
        fn extract(&self, text: &str) -> ParsedPayment {
            self.calls.set(self.calls.get() + 1);
            HeuristicParser::new().extract(text)
        }
    }

    #[test]
    fn test_absent_llm_uses_heuristic() {
        let resolved = resolve_payment(None, FULL_EMAIL, DEFAULT_PREFERENCE_THRESHOLD);

        assert_eq!(resolved.source, PaymentSource::Heuristic);
        assert_eq!(resolved.payment.brand.as_deref(), Some("Acme Corp"));
        assert_eq!(resolved.payment.confidence, 0.99);
    }

    #[test]
    fn test_confident_llm_skips_heuristic() {
        let counter = CountingExtractor { calls: Cell::new(0) };
        let resolved = resolve_with(
            &counter,
            Some(llm_result(0.98)),
            FULL_EMAIL,
            DEFAULT_PREFERENCE_THRESHOLD,
        );

        assert_eq!(resolved.source, PaymentSource::Probabilistic);
        assert_eq!(resolved.payment.brand.as_deref(), Some("From LLM"));
        assert_eq!(counter.calls.get(), 0);
    }

    #[test]
    fn test_more_confident_heuristic_wins() {
        let resolved = resolve_payment(
            Some(llm_result(0.8)),
            FULL_EMAIL,
            DEFAULT_PREFERENCE_THRESHOLD,
        );

        assert_eq!(resolved.source, PaymentSource::Heuristic);
        assert_eq!(resolved.payment.brand.as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn test_tie_keeps_llm() {
        // brand + amount + status: heuristic confidence 0.9
        let text = "Client: Acme Corp\nAmount: $500.00\nStatus: pending";
        let resolved = resolve_payment(Some(llm_result(0.9)), text, DEFAULT_PREFERENCE_THRESHOLD);

        assert_eq!(resolved.source, PaymentSource::Probabilistic);
    }

    #[test]
    fn test_less_confident_heuristic_loses() {
        let resolved = resolve_payment(Some(llm_result(0.95)), "", DEFAULT_PREFERENCE_THRESHOLD);

        assert_eq!(resolved.source, PaymentSource::Probabilistic);
        assert_eq!(resolved.payment.confidence, 0.95);
    }
}
