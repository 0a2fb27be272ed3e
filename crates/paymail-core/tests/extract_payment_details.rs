use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::str::FromStr;

use paymail_core::{extract_payment_details, ParsedPayment, PaymentStatus};

const ALLOWED_CONFIDENCE: [f64; 5] = [0.6, 0.7, 0.8, 0.9, 0.99];

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn samples() -> Vec<&'static str> {
    vec![
        "",
        "hello",
        "Total: $100 and $250.50",
        "Client: Acme Corp",
        "Due Date: March 3, 2025",
        "Payment due by 03/04/25",
        "Invoice Date: January 1, 2025\nTerms: Net 30",
        "Your invoice is paid and pending review",
        "Company: Globex\nAmount due: $1,000.00\nDue on 12/01/2025\nStatus: overdue",
        "Regards,\nJane Doe\nInitech\n$5",
        "\t\r  \n\n",
    ]
}

#[test]
fn test_confidence_is_from_fixed_table() {
    for text in samples() {
        let payment = extract_payment_details(text);
        assert!(
            ALLOWED_CONFIDENCE.contains(&payment.confidence),
            "unexpected confidence {} for {:?}",
            payment.confidence,
            text
        );
        assert_eq!(payment.confidence, ALLOWED_CONFIDENCE[payment.scored_fields()]);
    }
}

#[test]
fn test_extraction_is_idempotent() {
    for text in samples() {
        assert_eq!(extract_payment_details(text), extract_payment_details(text));
    }
}

#[test]
fn test_maximum_amount_is_selected() {
    let payment = extract_payment_details("Subtotal $100\nTotal $250.50");
    assert_eq!(payment.amount, Some(dec("250.5")));
    assert_eq!(payment.currency.as_deref(), Some("USD"));
}

#[test]
fn test_out_of_range_amount_still_counts() {
    let payment =
        extract_payment_details("Total due: $999,999,999,999,999,999,999,999,999,999.00");

    assert_eq!(payment.amount, Some(Decimal::MAX));
    assert_eq!(payment.confidence, 0.7);
}

#[test]
fn test_due_date_normalization() {
    assert_eq!(
        extract_payment_details("Due Date: March 3, 2025").due_date,
        ymd(2025, 3, 3)
    );
    assert_eq!(
        extract_payment_details("Payment due by 03/04/25").due_date,
        ymd(2025, 3, 4)
    );
}

#[test]
fn test_due_date_serializes_as_iso_date() {
    let payment = extract_payment_details("Due Date: March 3, 2025");
    let json = serde_json::to_value(&payment).unwrap();

    assert_eq!(json["dueDate"], "2025-03-03");
}

#[test]
fn test_net_days_fallback() {
    let payment =
        extract_payment_details("Invoice Date: January 1, 2025\nPayment terms: Net 30\n");
    assert_eq!(payment.due_date, ymd(2025, 1, 31));
}

#[test]
fn test_labeled_brand() {
    let payment = extract_payment_details("Hello,\nClient: Acme Corp\nThank you");
    assert_eq!(payment.brand.as_deref(), Some("Acme Corp"));
}

#[test]
fn test_signature_brand() {
    let payment = extract_payment_details("Please settle the invoice.\n\nBest regards\nRegards,\nJane Doe\nInitech LLC");
    assert_eq!(payment.brand.as_deref(), Some("Jane Doe"));
}

#[test]
fn test_pending_beats_paid() {
    let payment = extract_payment_details("Half was paid, the rest is pending.");
    assert_eq!(payment.status, Some(PaymentStatus::Pending));
}

#[test]
fn test_empty_input() {
    assert_eq!(
        extract_payment_details(""),
        ParsedPayment {
            confidence: 0.6,
            ..Default::default()
        }
    );
}

#[test]
fn test_full_match() {
    let email = "\
Hi there,

Please find your invoice below.

Vendor: Stark Industries
Total amount: $12,450.00
Payment due: 04/15/2025
Status: Awaiting payment

Sincerely,
Pepper Potts
";

    assert_eq!(
        extract_payment_details(email),
        ParsedPayment {
            brand: Some("Stark Industries".to_string()),
            amount: Some(dec("12450")),
            currency: Some("USD".to_string()),
            due_date: ymd(2025, 4, 15),
            status: Some(PaymentStatus::Pending),
            confidence: 0.99,
        }
    );
}

#[test]
fn test_confidence_grows_with_fields() {
    let steps = [
        "nothing useful",
        "Client: Acme Corp",
        "Client: Acme Corp\nAmount: 10.00",
        "Client: Acme Corp\nAmount: 10.00\nStatus: overdue",
        "Client: Acme Corp\nAmount: 10.00\nStatus: overdue\nDue Date: May 5, 2025",
    ];

    let confidences: Vec<f64> = steps
        .iter()
        .map(|text| extract_payment_details(text).confidence)
        .collect();

    assert_eq!(confidences, vec![0.6, 0.7, 0.8, 0.9, 0.99]);
}
