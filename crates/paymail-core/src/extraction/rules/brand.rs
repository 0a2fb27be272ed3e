//! Brand (counterparty) extraction from the line structure of an email.

use tracing::debug;

use super::normalize::split_lines;
use super::patterns::{
    BRAND_DISALLOWED, BRAND_LABELS, ORGANIZATION_LINE, PERSON_NAME, SIGN_OFF,
};

/// Longest line accepted as an organization name in a signature block.
const MAX_ORGANIZATION_LEN: usize = 64;

/// Lines inspected after a sign-off.
const SIGNATURE_LOOKAHEAD: usize = 2;

/// Extract the brand from email text.
///
/// A labeled line ("Client: Acme Corp") wins; otherwise the signature
/// block closest to the end of the email is used.
pub fn extract_brand(text: &str) -> Option<String> {
    let lines = split_lines(text);
    labeled_brand(&lines).or_else(|| signature_brand(&lines))
}

fn labeled_brand(lines: &[&str]) -> Option<String> {
    for line in lines {
        if !BRAND_LABELS.iter().any(|label| label.is_match(line)) {
            continue;
        }

        let Some((_, remainder)) = line.split_once([':', '-']) else {
            continue;
        };

        let remainder = remainder.trim();
        if remainder.chars().any(|c| c.is_ascii_alphabetic()) {
            debug!("Brand from labeled line {:?}", line);
            return clean_brand(remainder);
        }
    }

    None
}

fn signature_brand(lines: &[&str]) -> Option<String> {
    for i in (0..lines.len()).rev() {
        if !SIGN_OFF.is_match(lines[i]) {
            continue;
        }

        let start = (i + 1).min(lines.len());
        let end = (i + 1 + SIGNATURE_LOOKAHEAD).min(lines.len());
        let following = &lines[start..end];

        // Length cap applies to the first organization-like line only
        let organization = following
            .iter()
            .find(|line| ORGANIZATION_LINE.is_match(line) && !line.contains('@'))
            .filter(|line| line.chars().count() <= MAX_ORGANIZATION_LEN);
        let person = following
            .iter()
            .find(|line| PERSON_NAME.is_match(line))
            .or(following.get(1));

        if let Some(brand) = organization.or(person).and_then(|line| clean_brand(line)) {
            debug!("Brand from signature block at line {}", i);
            return Some(brand);
        }
    }

    None
}

/// Keep letters, digits, space, `&` and `-`, then trim.
fn clean_brand(s: &str) -> Option<String> {
    let cleaned = BRAND_DISALLOWED.replace_all(s, "");
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_line() {
        assert_eq!(extract_brand("Client: Acme Corp"), Some("Acme Corp".to_string()));
        assert_eq!(
            extract_brand("Hello\nVendor - Smith & Sons, Inc.\nThanks"),
            Some("Smith & Sons Inc".to_string())
        );
    }

    #[test]
    fn test_labeled_line_without_letters_is_skipped() {
        let text = "Client ID: 12345\nCompany: Globex";
        assert_eq!(extract_brand(text), Some("Globex".to_string()));
    }

    #[test]
    fn test_label_without_separator_is_skipped() {
        let text = "Our company thanks you\nRegards,\nInitech";
        assert_eq!(extract_brand(text), Some("Initech".to_string()));
    }

    #[test]
    fn test_signature_prefers_organization_line() {
        let text = "Please pay soon.\n\nRegards,\njane@example.com\nWayne Enterprises";
        assert_eq!(extract_brand(text), Some("Wayne Enterprises".to_string()));
    }

    #[test]
    fn test_signature_falls_back_to_person_name() {
        let text = "Sincerely,\njohn Smith signs as John Smith <john@acme.io>";
        assert_eq!(
            extract_brand(text),
            Some("john Smith signs as John Smith johnacmeio".to_string())
        );
    }

    #[test]
    fn test_overlong_organization_line_yields_to_person_name() {
        let long_line = "Globex Corporation International Holdings and Subsidiary Trading Units";
        assert!(long_line.len() > MAX_ORGANIZATION_LEN);

        let text = format!("Regards,\n{}\nShort Co", long_line);
        assert_eq!(extract_brand(&text), Some(long_line.to_string()));
    }

    #[test]
    fn test_second_signature_line_is_last_resort() {
        let text = "Thanks,\njohn\nacme billing";
        assert_eq!(extract_brand(text), Some("acme billing".to_string()));

        // a single lowercase line is not enough
        assert_eq!(extract_brand("Thanks,\njohn"), None);
    }

    #[test]
    fn test_last_signature_block_wins() {
        let text = "Thanks,\nFirst Corp\n> quoted reply\nRegards,\nSecond Corp";
        assert_eq!(extract_brand(text), Some("Second Corp".to_string()));
    }

    #[test]
    fn test_empty_signature_continues_scan() {
        let text = "Thanks,\nUmbrella\nmore text\nregards";
        assert_eq!(extract_brand(text), Some("Umbrella".to_string()));
    }

    #[test]
    fn test_no_brand() {
        assert_eq!(extract_brand(""), None);
        assert_eq!(extract_brand("just some lowercase text\nwith lines"), None);
    }
}
