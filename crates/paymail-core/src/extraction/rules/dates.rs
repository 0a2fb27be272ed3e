//! Due date extraction for payment emails.

use chrono::{Days, NaiveDate};
use tracing::debug;

use super::patterns::{DATE_LONG, DATE_NUMERIC, DUE_PHRASES, INVOICE_DATE, NET_TERMS};
use super::{ExtractionMatch, FieldExtractor};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Date grammar extractor for a short text segment.
///
/// Long-form dates (`March 3, 2025`) are preferred over numeric ones
/// (`03/04/25`). Matches that do not form a real calendar date are skipped.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // Month DD, YYYY
        for caps in DATE_LONG.captures_iter(text) {
            let Some(month) = month_from_name(&caps[1]) else {
                continue;
            };
            let day: u32 = caps[2].parse().unwrap_or(0);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if let (Some(date), Some(full_match)) =
                (NaiveDate::from_ymd_opt(year, month, day), caps.get(0))
            {
                results.push(
                    ExtractionMatch::new(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // MM/DD/YY, MM-DD-YYYY
        for caps in DATE_NUMERIC.captures_iter(text) {
            let month: u32 = caps[1].parse().unwrap_or(0);
            let day: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            if let (Some(date), Some(full_match)) =
                (NaiveDate::from_ymd_opt(year, month, day), caps.get(0))
            {
                results.push(
                    ExtractionMatch::new(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Extract the payment due date from normalized text.
///
/// Explicit due phrases are tried first; failing that, "Net N" terms are
/// applied to the invoice date.
pub fn extract_due_date(text: &str) -> Option<NaiveDate> {
    explicit_due_date(text).or_else(|| net_terms_due_date(text))
}

fn explicit_due_date(text: &str) -> Option<NaiveDate> {
    let extractor = DateExtractor::new();

    for phrase in DUE_PHRASES.iter() {
        for caps in phrase.captures_iter(text) {
            let Some(segment) = caps.get(1) else {
                continue;
            };

            if let Some(date) = extractor.extract(segment.as_str()) {
                debug!("Due date {} from segment {:?}", date.value, segment.as_str());
                return Some(date.value);
            }
        }
    }

    None
}

fn net_terms_due_date(text: &str) -> Option<NaiveDate> {
    let days: u64 = NET_TERMS.captures(text)?.get(1)?.as_str().parse().ok()?;
    let segment = INVOICE_DATE.captures(text)?.get(1)?;
    let invoice_date = DateExtractor::new().extract(segment.as_str())?.value;

    debug!("Applying net {} terms to invoice date {}", days, invoice_date);
    invoice_date.checked_add_days(Days::new(days))
}

/// Month number for a full English month name or a prefix of one at
/// least three letters long ("Mar", "Sept", "december").
pub fn month_from_name(name: &str) -> Option<u32> {
    if name.len() < 3 {
        return None;
    }

    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|month| month.starts_with(name.as_str()))
        .map(|index| index as u32 + 1)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 { 2000 + year } else { year }
}
