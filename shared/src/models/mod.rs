//! Data models shared across crates

pub mod assignment;
pub mod course;
pub mod enrollment;
pub mod field;
pub mod profile;

pub use assignment::{
    AssignmentCreate, AssignmentEarnings, CommissionSummary, MarketerAssignment,
    MAX_COMMISSION_RATE, MIN_COMMISSION_RATE,
};
pub use course::{
    default_enrollment_fields, Course, CourseCreate, CourseFieldConfig, CourseMode, CourseUpdate,
};
pub use enrollment::{
    EnrollmentCreate, EnrollmentRecord, EnrollmentStatus, EnrollmentStatusUpdate, PaymentMethod,
};
pub use field::{field_def, FieldDef, FieldKind, ENROLLMENT_FIELDS};
pub use profile::{Profile, ProfileCreate, Role};
