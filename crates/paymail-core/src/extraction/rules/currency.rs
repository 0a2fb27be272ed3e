//! Currency detection.

use super::patterns::CURRENCY_MARKER;

/// The only currency the heuristic rules infer.
pub const USD: &str = "USD";

/// "USD" when the text carries a dollar marker (`USD`, `US $`, `$`).
pub fn detect_currency(text: &str) -> Option<String> {
    CURRENCY_MARKER.is_match(text).then(|| USD.to_string())
}
