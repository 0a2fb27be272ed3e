//! Rule-based field extractors for payment emails.

pub mod amounts;
pub mod brand;
pub mod currency;
pub mod dates;
pub mod normalize;
pub mod patterns;
pub mod status;

pub use amounts::{extract_amount, parse_amount, AmountExtractor};
pub use brand::extract_brand;
pub use currency::detect_currency;
pub use dates::{extract_due_date, month_from_name, DateExtractor};
pub use normalize::{normalize_text, split_lines};
pub use status::extract_status;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the preferred occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A candidate value and where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span of the value in the scanned text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
