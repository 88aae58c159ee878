// 📐 Input Validator - raw chat text → 6-digit BIN
// Only the first six digits are ever kept; full card numbers are not stored.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub const BIN_LENGTH: usize = 6;

// ============================================================================
// BIN CODE
// ============================================================================

/// Exactly six ASCII digits. Only constructible through `extract_bin`
/// or `BinCode::parse`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BinCode(String);

impl BinCode {
    /// Strict parse: the whole string must be six digits
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == BIN_LENGTH && s.bytes().all(|b| b.is_ascii_digit()) {
            Some(BinCode(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BinCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("input too short: {len} characters, need at least 6")]
    TooShort { len: usize },

    #[error("non-digit character at position {position}")]
    NonDigit { position: usize },
}

impl ValidationError {
    /// Prompt shown to the user instead of the internal error
    pub fn user_message(&self) -> &'static str {
        "❌ Please send the first 6 digits of the card number (e.g. 424242)."
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Trim surrounding whitespace and take the first six characters as the BIN.
///
/// Longer numeric strings are accepted (a full card number works), but only
/// the first six characters are checked and kept.
pub fn extract_bin(raw: &str) -> Result<BinCode, ValidationError> {
    let trimmed = raw.trim();

    let len = trimmed.chars().count();
    if len < BIN_LENGTH {
        return Err(ValidationError::TooShort { len });
    }

    let mut bin = String::with_capacity(BIN_LENGTH);
    for (position, c) in trimmed.chars().take(BIN_LENGTH).enumerate() {
        if !c.is_ascii_digit() {
            return Err(ValidationError::NonDigit { position });
        }
        bin.push(c);
    }

    Ok(BinCode(bin))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_six_digits() {
        let bin = extract_bin("424242").unwrap();
        assert_eq!(bin.as_str(), "424242");
    }

    #[test]
    fn test_trims_whitespace() {
        let bin = extract_bin("  \t553691\n").unwrap();
        assert_eq!(bin.as_str(), "553691");
    }

    #[test]
    fn test_full_card_number_keeps_first_six() {
        let bin = extract_bin("4111111111111111").unwrap();
        assert_eq!(bin.as_str(), "411111");
    }

    #[test]
    fn test_trailing_garbage_after_six_digits_is_ignored() {
        let bin = extract_bin("220220 xx").unwrap();
        assert_eq!(bin.as_str(), "220220");
    }

    #[test]
    fn test_rejects_short_input() {
        assert_eq!(extract_bin("12345"), Err(ValidationError::TooShort { len: 5 }));
        assert_eq!(extract_bin("   1234   "), Err(ValidationError::TooShort { len: 4 }));
        assert_eq!(extract_bin(""), Err(ValidationError::TooShort { len: 0 }));
    }

    #[test]
    fn test_rejects_non_digits_in_first_six() {
        assert_eq!(extract_bin("42a242"), Err(ValidationError::NonDigit { position: 2 }));
        assert_eq!(extract_bin("4242 4242"), Err(ValidationError::NonDigit { position: 4 }));
        assert_eq!(extract_bin("hello world"), Err(ValidationError::NonDigit { position: 0 }));
    }

    #[test]
    fn test_rejects_non_ascii_digits() {
        assert!(extract_bin("４２４２４２").is_err());
    }

    #[test]
    fn test_user_message_mentions_format() {
        let err = extract_bin("abc").unwrap_err();
        assert!(err.user_message().contains("6 digits"));
    }

    #[test]
    fn test_bin_code_parse_is_strict() {
        assert!(BinCode::parse("424242").is_some());
        assert!(BinCode::parse("4242424").is_none());
        assert!(BinCode::parse(" 424242").is_none());
    }
}
