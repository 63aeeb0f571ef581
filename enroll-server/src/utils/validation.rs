//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on reasonable UX limits for names, notes and
//! identifiers; SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: course titles, learner names, profile names
pub const MAX_NAME_LEN: usize = 200;

/// Notes and free-text answers (motivation, note to instructor, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, national id, reference numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs (LinkedIn profile and friends)
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

// ── Format checks (enrollment form fields) ──────────────────────────

/// Local mobile number check: `09` followed by exactly 8 digits, after
/// stripping `-` separators.
pub fn is_valid_phone(value: &str) -> bool {
    let stripped: String = value.chars().filter(|c| *c != '-').collect();
    stripped.len() == 10
        && stripped.starts_with("09")
        && stripped.chars().all(|c| c.is_ascii_digit())
}

/// Standard email address shape, via the validator crate.
pub fn is_valid_email(value: &str) -> bool {
    use validator::ValidateEmail;
    value.validate_email()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Rust 101", "title", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "title", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "title", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".into()), "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "note", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_phone_pattern() {
        assert!(is_valid_phone("0912345678"));
        assert!(is_valid_phone("091-234-5678")); // 10 digits after stripping
        assert!(!is_valid_phone("091234567")); // 9 digits
        assert!(!is_valid_phone("091-234-567")); // 9 digits after stripping
        assert!(!is_valid_phone("0812345678")); // wrong prefix
        assert!(!is_valid_phone("09123456789")); // 11 digits
        assert!(!is_valid_phone("09x2345678"));
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("you@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld@twice"));
    }
}
