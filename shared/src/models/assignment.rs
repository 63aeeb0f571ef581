//! Marketer Assignment Model

use serde::{Deserialize, Serialize};

/// Commission rate bounds (integer percent, inclusive)
pub const MIN_COMMISSION_RATE: i64 = 1;
pub const MAX_COMMISSION_RATE: i64 = 50;

/// Marketer assignment entity
///
/// Binds one marketer to one course with an agreed commission rate. At most
/// one active assignment exists per (marketer, course) pair. Marketer name,
/// email and course title are denormalized for dashboard listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MarketerAssignment {
    pub id: i64,
    pub course_id: i64,
    pub instructor_id: String,
    pub marketer_id: String,
    pub marketer_name: String,
    pub marketer_email: String,
    pub course_title: String,
    /// Integer percent, 1-50 inclusive
    pub commission_rate: i64,
    pub created_at: i64,
}

/// Create assignment payload
///
/// Marketer name/email and course title are resolved server-side from the
/// profiles and courses tables, never trusted from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentCreate {
    pub course_id: i64,
    pub instructor_id: String,
    pub marketer_id: String,
    pub commission_rate: i64,
}

/// Per-assignment earnings line of a marketer's commission summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentEarnings {
    pub assignment_id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub commission_rate: i64,
    /// Accepted referred enrollments for this course
    pub accepted_count: usize,
    /// Settled commission in the target currency, whole units
    pub earned: i64,
}

/// A marketer's aggregate commission view
///
/// `settled` sums accepted records only; `estimated` sums reserved and
/// pending records. Rejected records contribute to neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub marketer_id: String,
    pub settled: i64,
    pub estimated: i64,
    pub breakdown: Vec<AssignmentEarnings>,
}
