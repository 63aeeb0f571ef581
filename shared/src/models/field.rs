//! Enrollment field definition catalog
//!
//! Courses configure which enrollment fields a learner must fill in by
//! referencing field ids from this fixed catalog. The catalog owns the
//! label, input kind and (for selects) the option list; a course config
//! only carries `{field_id, required}` pairs.

use serde::{Deserialize, Serialize};

/// Input kind of an enrollment field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Tel,
    Email,
    Url,
    Date,
    Select,
    Textarea,
}

/// One entry of the enrollment field catalog
///
/// `locked` fields (full name, phone) are mandatory for every course no
/// matter what the course config says.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDef {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'static [&'static str],
}

/// The fixed enrollment field catalog
pub const ENROLLMENT_FIELDS: &[FieldDef] = &[
    FieldDef {
        id: "full_name",
        label: "Full Name",
        kind: FieldKind::Text,
        locked: true,
        placeholder: Some("e.g. Mohammed Ahmed Abdallah"),
        options: &[],
    },
    FieldDef {
        id: "phone",
        label: "Phone Number",
        kind: FieldKind::Tel,
        locked: true,
        placeholder: Some("09xxxxxxxx"),
        options: &[],
    },
    FieldDef {
        id: "email",
        label: "Email Address",
        kind: FieldKind::Email,
        locked: false,
        placeholder: Some("you@example.com"),
        options: &[],
    },
    FieldDef {
        id: "national_id",
        label: "National ID",
        kind: FieldKind::Text,
        locked: false,
        placeholder: Some("Enter your national ID number"),
        options: &[],
    },
    FieldDef {
        id: "date_of_birth",
        label: "Date of Birth",
        kind: FieldKind::Date,
        locked: false,
        placeholder: None,
        options: &[],
    },
    FieldDef {
        id: "gender",
        label: "Gender",
        kind: FieldKind::Select,
        locked: false,
        placeholder: None,
        options: &["Male", "Female", "Prefer not to say"],
    },
    FieldDef {
        id: "city",
        label: "City / Location",
        kind: FieldKind::Text,
        locked: false,
        placeholder: Some("e.g. Khartoum, Omdurman"),
        options: &[],
    },
    FieldDef {
        id: "university",
        label: "University / School",
        kind: FieldKind::Text,
        locked: false,
        placeholder: Some("e.g. University of Khartoum"),
        options: &[],
    },
    FieldDef {
        id: "specialization",
        label: "Specialization / Major",
        kind: FieldKind::Text,
        locked: false,
        placeholder: Some("e.g. Computer Science, Engineering"),
        options: &[],
    },
    FieldDef {
        id: "education_level",
        label: "Education Level",
        kind: FieldKind::Select,
        locked: false,
        placeholder: None,
        options: &[
            "High School",
            "Diploma",
            "Bachelor's",
            "Master's",
            "PhD",
            "Other",
        ],
    },
    FieldDef {
        id: "occupation",
        label: "Occupation / Job Title",
        kind: FieldKind::Text,
        locked: false,
        placeholder: Some("e.g. Software Engineer, Student"),
        options: &[],
    },
    FieldDef {
        id: "experience",
        label: "Years of Experience",
        kind: FieldKind::Select,
        locked: false,
        placeholder: None,
        options: &[
            "No experience",
            "Less than 1 year",
            "1-2 years",
            "3-5 years",
            "5+ years",
        ],
    },
    FieldDef {
        id: "linkedin",
        label: "LinkedIn Profile",
        kind: FieldKind::Url,
        locked: false,
        placeholder: Some("https://linkedin.com/in/yourprofile"),
        options: &[],
    },
    FieldDef {
        id: "motivation",
        label: "Why do you want to join?",
        kind: FieldKind::Textarea,
        locked: false,
        placeholder: Some("Tell us why you're interested in this course..."),
        options: &[],
    },
    FieldDef {
        id: "referral",
        label: "How did you hear about us?",
        kind: FieldKind::Text,
        locked: false,
        placeholder: Some("e.g. Friend, social media, Google"),
        options: &[],
    },
    FieldDef {
        id: "note",
        label: "Additional Notes",
        kind: FieldKind::Textarea,
        locked: false,
        placeholder: Some("Any questions or special requests..."),
        options: &[],
    },
];

/// Look up a field definition by catalog id
pub fn field_def(id: &str) -> Option<&'static FieldDef> {
    ENROLLMENT_FIELDS.iter().find(|f| f.id == id)
}
