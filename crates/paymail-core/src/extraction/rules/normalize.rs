//! Whitespace normalization and the line view used for brand detection.

use super::patterns::{LINE_BREAKS, SPACE_RUNS, TAB_CR_RUNS};

/// Collapse tab/carriage-return runs and space runs to a single space and
/// trim the ends. Newlines are kept so the line structure survives.
pub fn normalize_text(raw: &str) -> String {
    let text = TAB_CR_RUNS.replace_all(raw, " ");
    let text = SPACE_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}

/// Non-empty trimmed lines, split on runs of newlines.
pub fn split_lines(text: &str) -> Vec<&str> {
    LINE_BREAKS
        .split(text)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(
            normalize_text("  Total:\t\t$100\r\n  due   soon  "),
            "Total: $100 \n due soon"
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \t\r "), "");
    }

    #[test]
    fn test_split_lines_drops_blank_lines() {
        let lines = split_lines("Hello\n\n\n  Client: Acme  \n \nRegards");
        assert_eq!(lines, vec!["Hello", "Client: Acme", "Regards"]);
    }
}
