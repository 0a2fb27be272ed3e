//! Amount extraction for payment emails.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT_PATTERNS;
use super::{ExtractionMatch, FieldExtractor};

/// Amount field extractor.
///
/// Every grammar in `AMOUNT_PATTERNS` contributes candidates; the largest
/// one is taken as the amount owed, since emails often restate a smaller
/// subtotal or fee next to the full amount.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text)
            .into_iter()
            .max_by(|a, b| a.value.cmp(&b.value))
    }

    /// Candidates from all grammars. The same numeral matched by two
    /// grammars appears twice.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for pattern in AMOUNT_PATTERNS.iter() {
            for caps in pattern.captures_iter(text) {
                let (Some(full_match), Some(numeral)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                if let Some(amount) = parse_amount(numeral.as_str()) {
                    results.push(
                        ExtractionMatch::new(amount, full_match.as_str())
                            .with_position(numeral.start(), numeral.end()),
                    );
                }
            }
        }

        results
    }
}

/// Extract the amount owed from normalized text.
pub fn extract_amount(text: &str) -> Option<Decimal> {
    AmountExtractor::new().extract(text).map(|m| m.value)
}

/// Parse a US-formatted numeral (e.g., "1,234.56").
///
/// Numerals beyond `Decimal` range saturate to `Decimal::MAX`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let numeral = s.replace(',', "");
    if let Ok(amount) = Decimal::from_str(&numeral) {
        return Some(amount);
    }

    let value: f64 = numeral.parse().ok().filter(|v: &f64| v.is_finite() && *v >= 0.0)?;
    Some(Decimal::from_f64_retain(value).unwrap_or(Decimal::MAX))
}
