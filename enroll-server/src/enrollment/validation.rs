//! Enrollment form validation
//!
//! Runs at the collecting-details transition. All offending fields are
//! reported together; a failed validation leaves the session untouched.

use super::fields::ResolvedField;
use crate::utils::validation::{is_valid_email, is_valid_phone};
use crate::utils::{AppError, ErrorCode};
use shared::models::FieldKind;
use std::collections::{BTreeMap, HashMap};

/// Validate a submitted form against the course's resolved field list.
///
/// Returns one message per offending field:
/// - required fields must be non-empty after trimming
/// - tel/email format checks apply whenever a value is present, independent
///   of the required flag
pub fn validate_form(
    fields: &[ResolvedField],
    form: &HashMap<String, String>,
) -> Result<(), BTreeMap<String, String>> {
    let mut errors = BTreeMap::new();

    for field in fields {
        let value = form.get(field.def.id).map(|v| v.trim()).unwrap_or("");

        if field.required && value.is_empty() {
            errors.insert(
                field.def.id.to_string(),
                format!("{} is required", field.def.label),
            );
            continue;
        }
        if value.is_empty() {
            continue;
        }

        match field.def.kind {
            FieldKind::Tel if !is_valid_phone(value) => {
                errors.insert(
                    field.def.id.to_string(),
                    "Enter a valid Sudanese number (09xxxxxxxx)".to_string(),
                );
            }
            FieldKind::Email if !is_valid_email(value) => {
                errors.insert(
                    field.def.id.to_string(),
                    "Enter a valid email address".to_string(),
                );
            }
            _ => {}
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Fold a per-field error map into an [`AppError`] with one detail per field.
pub fn validation_error(errors: BTreeMap<String, String>) -> AppError {
    let mut err = AppError::with_message(
        ErrorCode::ValidationFailed,
        "Enrollment form validation failed",
    );
    for (field, message) in errors {
        err = err.with_detail(field, message);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrollment::fields::resolve_course_fields;
    use shared::models::CourseFieldConfig;

    fn fields(configs: &[(&str, bool)]) -> Vec<ResolvedField> {
        let configured: Vec<CourseFieldConfig> = configs
            .iter()
            .map(|(id, required)| CourseFieldConfig::new(*id, *required))
            .collect();
        resolve_course_fields(&configured)
    }

    fn form(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_required_field_blocks() {
        let fields = fields(&[("full_name", true), ("phone", true)]);
        let errors = validate_form(&fields, &form(&[("full_name", "Amna Hassan")])).unwrap_err();
        assert_eq!(errors.get("phone").unwrap(), "Phone Number is required");
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let fields = fields(&[("full_name", true), ("phone", true)]);
        let errors = validate_form(
            &fields,
            &form(&[("full_name", "   "), ("phone", "0912345678")]),
        )
        .unwrap_err();
        assert!(errors.contains_key("full_name"));
        assert!(!errors.contains_key("phone"));
    }

    #[test]
    fn test_phone_format_cases() {
        let fields = fields(&[("full_name", true), ("phone", true)]);

        let ok = form(&[("full_name", "A"), ("phone", "0912345678")]);
        assert!(validate_form(&fields, &ok).is_ok());

        let nine_digits = form(&[("full_name", "A"), ("phone", "091234567")]);
        assert!(validate_form(&fields, &nine_digits).is_err());

        let hyphenated = form(&[("full_name", "A"), ("phone", "091-234-5678")]);
        assert!(validate_form(&fields, &hyphenated).is_ok());

        let short_hyphenated = form(&[("full_name", "A"), ("phone", "091-234-567")]);
        assert!(validate_form(&fields, &short_hyphenated).is_err());
    }

    #[test]
    fn test_optional_email_checked_only_when_present() {
        let fields = fields(&[("full_name", true), ("phone", true), ("email", false)]);

        let absent = form(&[("full_name", "A"), ("phone", "0912345678")]);
        assert!(validate_form(&fields, &absent).is_ok());

        let bad = form(&[
            ("full_name", "A"),
            ("phone", "0912345678"),
            ("email", "not-an-email"),
        ]);
        let errors = validate_form(&fields, &bad).unwrap_err();
        assert_eq!(errors.get("email").unwrap(), "Enter a valid email address");
    }

    #[test]
    fn test_all_offending_fields_reported_together() {
        let fields = fields(&[("full_name", true), ("phone", true), ("email", false)]);
        let errors = validate_form(&fields, &form(&[("email", "nope")])).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validation_error_carries_field_details() {
        let mut map = BTreeMap::new();
        map.insert("phone".to_string(), "Phone Number is required".to_string());
        let err = validation_error(map);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(
            err.details.unwrap().get("phone").unwrap(),
            "Phone Number is required"
        );
    }
}
