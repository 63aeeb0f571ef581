//! Enrollment Record Model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Enrollment record lifecycle status
///
/// `reserved` → `pending` → `accepted` | `rejected`. Transitions are
/// append-only: a decided record is never reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    /// Seat held, no payment proof submitted yet
    Reserved,
    /// Payment proof submitted, awaiting review
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: EnrollmentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Reserved, Self::Pending)
                | (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
        )
    }

    /// Decided records accept no further transitions
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reserved" => Ok(Self::Reserved),
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown enrollment status: {other}")),
        }
    }
}

/// Payment method chosen during enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Bank,
    Momo,
    /// Reserved seat, payment deferred
    #[default]
    NoneYet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Momo => "momo",
            Self::NoneYet => "none-yet",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank" => Ok(Self::Bank),
            "momo" => Ok(Self::Momo),
            "none-yet" => Ok(Self::NoneYet),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Enrollment record entity
///
/// The persisted outcome of one learner's enrollment session. `amount` and
/// `course_id` are immutable after creation; `amount` is the course price
/// at the time the record was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub id: i64,
    pub course_id: i64,
    pub instructor_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub payment: PaymentMethod,
    /// Amount in the base currency unit, copied from the course price
    pub amount: f64,
    pub status: EnrollmentStatus,
    /// Learner-facing reference number (`MSR-<course>-<digits>`)
    pub reference: String,
    pub note: Option<String>,
    /// Learner-supplied values keyed by catalog field id
    pub fields: HashMap<String, String>,
    /// Referring marketer, when the session came through a tracking link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketer_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create enrollment record payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentCreate {
    pub course_id: i64,
    pub instructor_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub payment: PaymentMethod,
    pub amount: f64,
    pub status: EnrollmentStatus,
    /// Generated server-side when absent
    pub reference: Option<String>,
    pub note: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, String>,
    pub marketer_id: Option<String>,
}

/// Update status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentStatusUpdate {
    pub status: EnrollmentStatus,
}
