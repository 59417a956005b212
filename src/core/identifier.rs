//! Property-name validation shared by allow-lists and resource kinds

use regex::Regex;
use std::sync::OnceLock;

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER_REGEX.get_or_init(|| {
        // ASCII letters, digits and underscore; no leading digit
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid")
    })
}

/// Check whether `name` is a non-empty identifier-shaped string
pub fn is_valid_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_camel_and_snake_case() {
        assert!(is_valid_identifier("title"));
        assert!(is_valid_identifier("userId"));
        assert!(is_valid_identifier("linkedInUrl"));
        assert!(is_valid_identifier("created_at"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("Like"));
        assert!(is_valid_identifier("field2"));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_rejects_leading_digit() {
        assert!(!is_valid_identifier("2fa"));
        assert!(!is_valid_identifier("0"));
    }

    #[test]
    fn test_rejects_punctuation_and_whitespace() {
        assert!(!is_valid_identifier("user-id"));
        assert!(!is_valid_identifier("user id"));
        assert!(!is_valid_identifier(" title"));
        assert!(!is_valid_identifier("title\n"));
        assert!(!is_valid_identifier("a.b"));
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert!(!is_valid_identifier("titré"));
    }
}
