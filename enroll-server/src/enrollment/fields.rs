//! Course field resolution
//!
//! Turns a course's configured `{field_id, required}` list into the render
//! list of catalog-backed fields. Unknown ids are dropped with a warning;
//! the locked catalog fields are always present and always required.

use serde::Serialize;
use shared::models::{field_def, CourseFieldConfig, FieldDef, FieldKind, ENROLLMENT_FIELDS};

/// A catalog field as rendered for one specific course
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub def: &'static FieldDef,
    pub required: bool,
}

/// Serializable projection of a [`ResolvedField`] for API responses
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'static [&'static str],
}

impl From<&ResolvedField> for FieldView {
    fn from(field: &ResolvedField) -> Self {
        Self {
            id: field.def.id,
            label: field.def.label,
            kind: field.def.kind,
            required: field.required,
            placeholder: field.def.placeholder,
            options: field.def.options,
        }
    }
}

/// Resolve a course's configured field list against the catalog.
///
/// - unknown field ids are skipped (warn log, no error)
/// - duplicate ids keep the first occurrence
/// - locked fields (full name, phone) are prepended when missing and are
///   required no matter what the config says
pub fn resolve_course_fields(configured: &[CourseFieldConfig]) -> Vec<ResolvedField> {
    let mut resolved: Vec<ResolvedField> = Vec::with_capacity(configured.len() + 2);

    for cfg in configured {
        if resolved.iter().any(|r| r.def.id == cfg.field_id) {
            continue;
        }
        match field_def(&cfg.field_id) {
            Some(def) => resolved.push(ResolvedField {
                def,
                required: cfg.required || def.locked,
            }),
            None => {
                tracing::warn!(
                    field_id = %cfg.field_id,
                    "Course references unknown enrollment field, skipping"
                );
            }
        }
    }

    for def in ENROLLMENT_FIELDS.iter().filter(|d| d.locked).rev() {
        if !resolved.iter().any(|r| r.def.id == def.id) {
            resolved.insert(0, ResolvedField { def, required: true });
        }
    }

    resolved
}
