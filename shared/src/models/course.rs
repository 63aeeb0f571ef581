//! Course Model

use serde::{Deserialize, Serialize};

/// Course delivery mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CourseMode {
    #[default]
    Online,
    InPerson,
    Hybrid,
}

impl CourseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::InPerson => "in-person",
            Self::Hybrid => "hybrid",
        }
    }
}

impl std::str::FromStr for CourseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "in-person" => Ok(Self::InPerson),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!("unknown course mode: {other}")),
        }
    }
}

/// One configured enrollment field on a course: a catalog id plus whether
/// the instructor marked it required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseFieldConfig {
    pub field_id: String,
    pub required: bool,
}

impl CourseFieldConfig {
    pub fn new(field_id: impl Into<String>, required: bool) -> Self {
        Self {
            field_id: field_id.into(),
            required,
        }
    }
}

/// Fallback field set for courses created before per-course field
/// configuration existed.
pub fn default_enrollment_fields() -> Vec<CourseFieldConfig> {
    vec![
        CourseFieldConfig::new("full_name", true),
        CourseFieldConfig::new("phone", true),
        CourseFieldConfig::new("email", false),
    ]
}

/// Course entity
///
/// Read-only reference data for the enrollment flow: the price is copied
/// onto each enrollment record at creation time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub instructor_id: String,
    pub title: String,
    /// Price in the base currency unit
    pub price: f64,
    pub mode: CourseMode,
    pub enrollment_fields: Vec<CourseFieldConfig>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create course payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCreate {
    pub instructor_id: String,
    pub title: String,
    /// Price in the base currency unit
    pub price: f64,
    #[serde(default)]
    pub mode: CourseMode,
    /// Empty means the default field set is used
    #[serde(default)]
    pub enrollment_fields: Vec<CourseFieldConfig>,
}

/// Update course payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub mode: Option<CourseMode>,
    pub enrollment_fields: Option<Vec<CourseFieldConfig>>,
}
