//! Payment status classification from keywords.

use crate::models::payment::PaymentStatus;

use super::patterns::STATUS_RULES;

/// Classify the payment status. Rules are checked in order and the first
/// keyword hit wins, so "pending" beats "paid".
///
/// Negation is not understood: "not yet paid" reads as `Received`.
pub fn extract_status(text: &str) -> Option<PaymentStatus> {
    STATUS_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, status)| *status)
}
