//! Common regex patterns for payment email extraction.
//!
//! Ordered tables (`AMOUNT_PATTERNS`, `DUE_PHRASES`, `BRAND_LABELS`,
//! `STATUS_RULES`) are scanned front to back and the first hit wins.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::payment::PaymentStatus;

lazy_static! {
    // Whitespace normalization
    pub static ref TAB_CR_RUNS: Regex = Regex::new(r"[\t\r]+").unwrap();

    pub static ref SPACE_RUNS: Regex = Regex::new(r" +").unwrap();

    pub static ref LINE_BREAKS: Regex = Regex::new(r"\n+").unwrap();

    // Amounts: numeral is #{1,3}(,###)*(.##)?
    pub static ref AMOUNT_MARKED: Regex = Regex::new(
        r"(?i)(?:USD|US\s*\$|\$)\s*([0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]{2})?)"
    ).unwrap();

    pub static ref AMOUNT_LABELED: Regex = Regex::new(
        r"(?i)amount\s*[:\-]?\s*(?:USD|US\s*\$|\$)?\s*([0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]{2})?)"
    ).unwrap();

    pub static ref AMOUNT_TOTAL: Regex = Regex::new(
        r"(?i)total\s*(?:due|amount)?\s*[:\-]?\s*(?:USD|US\s*\$|\$)?\s*([0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]{2})?)"
    ).unwrap();

    pub static ref AMOUNT_PATTERNS: Vec<&'static Regex> =
        vec![&*AMOUNT_MARKED, &*AMOUNT_LABELED, &*AMOUNT_TOTAL];

    // Date grammars
    pub static ref DATE_LONG: Regex = Regex::new(
        r"([A-Za-z]{3,9})\s+([0-9]{1,2}),\s+([0-9]{4})"
    ).unwrap();

    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"([0-9]{1,2})[/\-]([0-9]{1,2})[/\-]([0-9]{2,4})"
    ).unwrap();

    // Due date phrases, segment runs to the next period, newline or end
    pub static ref DUE_PHRASES: Vec<Regex> = vec![
        Regex::new(r"(?i)due\s*(?:date)?\s*[:\-]?\s*(.+?)(?:\.|\n|$)").unwrap(),
        Regex::new(r"(?i)(?:payment\s*due|payable\s*by|due\s*on|by)\s*(.+?)(?:\.|\n|$)").unwrap(),
    ];

    // Net terms ("Net 30") relative to the invoice date
    pub static ref NET_TERMS: Regex = Regex::new(r"(?i)net\s*([0-9]{1,3})").unwrap();

    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"(?i)invoice\s*date\s*[:\-]?\s*(.+?)(?:\.|\n|$)"
    ).unwrap();

    // Brand
    pub static ref BRAND_LABELS: Vec<Regex> = ["brand", "client", "company", "vendor", "organization"]
        .iter()
        .map(|label| Regex::new(&format!("(?i){}", label)).unwrap())
        .collect();

    pub static ref SIGN_OFF: Regex = Regex::new(r"(?i)^(?:regards|thanks|sincerely)").unwrap();

    pub static ref PERSON_NAME: Regex = Regex::new(r"[A-Z][A-Za-z]+\s+[A-Z][A-Za-z]+").unwrap();

    pub static ref ORGANIZATION_LINE: Regex = Regex::new(r"^[A-Z]").unwrap();

    pub static ref BRAND_DISALLOWED: Regex = Regex::new(r"[^A-Za-z0-9 &\-]").unwrap();

    // Status keywords, checked in order
    pub static ref STATUS_RULES: Vec<(Regex, PaymentStatus)> = vec![
        (Regex::new(r"(?i)pending|awaiting\s*payment").unwrap(), PaymentStatus::Pending),
        (Regex::new(r"(?i)paid|received|settled").unwrap(), PaymentStatus::Received),
        (Regex::new(r"(?i)overdue|late").unwrap(), PaymentStatus::Overdue),
    ];

    // Currency
    pub static ref CURRENCY_MARKER: Regex = Regex::new(r"(?i)USD|US\s*\$|\$").unwrap();
}
