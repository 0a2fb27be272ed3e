//! Payment detail records produced by the extractors.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment details extracted from a single email body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPayment {
    /// Organization or person responsible for the payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Amount owed, without currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Currency code. The heuristic extractor only ever infers "USD".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Payment due date, serialized as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Payment state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,

    /// Extraction confidence (0.0 - 0.99).
    #[serde(default)]
    pub confidence: f64,
}

impl ParsedPayment {
    /// Number of scored fields (amount, due date, brand, status) present.
    pub fn scored_fields(&self) -> usize {
        [
            self.amount.is_some(),
            self.due_date.is_some(),
            self.brand.is_some(),
            self.status.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Names of the scored fields that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.amount.is_none() {
            missing.push("amount");
        }
        if self.due_date.is_none() {
            missing.push("dueDate");
        }
        if self.brand.is_none() {
            missing.push("brand");
        }
        if self.status.is_none() {
            missing.push("status");
        }
        missing
    }
}

/// Payment state inferred from keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Awaiting payment.
    Pending,
    /// Paid, received or settled.
    Received,
    /// Past due.
    Overdue,
}

impl PaymentStatus {
    /// Parse a status label such as "pending" or "Received".
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "received" => Some(Self::Received),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Received => "Received",
            Self::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a parse-email request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseEmailRequest {
    /// Raw email text.
    pub email_text: String,

    /// Caller-supplied user identifier, echoed back in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Body of a parse-email response. `ok` is always true: extraction
/// failures surface as absent fields, never as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseEmailResponse {
    pub ok: bool,
    pub data: ParsedPayment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ParseEmailResponse {
    pub fn new(data: ParsedPayment, user_id: Option<String>) -> Self {
        Self {
            ok: true,
            data,
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_from_label() {
        assert_eq!(PaymentStatus::from_label("pending"), Some(PaymentStatus::Pending));
        assert_eq!(PaymentStatus::from_label(" RECEIVED "), Some(PaymentStatus::Received));
        assert_eq!(PaymentStatus::from_label("Overdue"), Some(PaymentStatus::Overdue));
        assert_eq!(PaymentStatus::from_label("paid"), None);
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let payment = ParsedPayment {
            amount: Some(Decimal::from_str("250.50").unwrap()),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 3),
            status: Some(PaymentStatus::Pending),
            confidence: 0.8,
            ..Default::default()
        };

        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["amount"], serde_json::json!(250.5));
        assert_eq!(json["dueDate"], "2025-03-03");
        assert_eq!(json["status"], "Pending");
        assert!(json.get("brand").is_none());
        assert!(json.get("currency").is_none());
    }

    #[test]
    fn test_missing_fields() {
        let payment = ParsedPayment {
            brand: Some("Acme Corp".to_string()),
            ..Default::default()
        };

        assert_eq!(payment.scored_fields(), 1);
        assert_eq!(payment.missing_fields(), vec!["amount", "dueDate", "status"]);
    }

    #[test]
    fn test_response_envelope() {
        let response = ParseEmailResponse::new(ParsedPayment::default(), Some("u-1".to_string()));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["data"]["confidence"], serde_json::json!(0.0));
    }
}
