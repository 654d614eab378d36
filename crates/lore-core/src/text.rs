//! Text normalization shared by extraction, resolution, and value comparison.
//!
//! Names and attribute values are compared accent- and case-insensitively:
//! "María García" and "maria  garcia" normalize to the same key.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a name or value for matching.
///
/// Performs:
/// - Unicode NFKD decomposition with combining marks removed
/// - Lowercase conversion
/// - Whitespace collapsing
pub fn normalize_key(s: &str) -> String {
    let folded: String = s
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a normalized key into its tokens.
pub fn key_tokens(key: &str) -> Vec<&str> {
    key.split(' ').filter(|t| !t.is_empty()).collect()
}

/// Whether the first character of `s` is uppercase.
pub fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

/// Whether the token contains any digit.
pub fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize_key("María García"), "maria garcia");
        assert_eq!(normalize_key("  JOSÉ   Pérez "), "jose perez");
    }

    #[test]
    fn keeps_enye_base_letter() {
        // ñ decomposes to n + combining tilde.
        assert_eq!(normalize_key("Muñoz"), "munoz");
    }

    #[test]
    fn tokens_split_on_single_space() {
        assert_eq!(key_tokens("juan garcia"), vec!["juan", "garcia"]);
        assert!(key_tokens("").is_empty());
    }

    #[test]
    fn uppercase_and_digits() {
        assert!(starts_uppercase("Ángel"));
        assert!(!starts_uppercase("ángel"));
        assert!(has_digit("R2D2"));
        assert!(!has_digit("Frodo"));
    }
}
