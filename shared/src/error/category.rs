//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 4xxx: Enrollment errors
/// - 5xxx: Payment errors
/// - 6xxx: Course errors
/// - 7xxx: Referral errors
/// - 8xxx: Profile errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Enrollment errors (4xxx)
    Enrollment,
    /// Payment errors (5xxx)
    Payment,
    /// Course errors (6xxx)
    Course,
    /// Referral errors (7xxx)
    Referral,
    /// Profile errors (8xxx)
    Profile,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            4000..5000 => Self::Enrollment,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Course,
            7000..8000 => Self::Referral,
            8000..9000 => Self::Profile,
            _ => Self::System,
        }
    }

    /// Determine category from an [`ErrorCode`]
    pub fn of(code: ErrorCode) -> Self {
        Self::from_code(code.code())
    }
}
