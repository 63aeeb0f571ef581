//! Unified error codes for the enrollment platform
//!
//! This module defines all error codes used across the server and clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Enrollment errors
//! - 5xxx: Payment errors
//! - 6xxx: Course / field catalog errors
//! - 7xxx: Referral / assignment errors
//! - 8xxx: Profile errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 4xxx: Enrollment ====================
    /// Enrollment record not found
    EnrollmentNotFound = 4001,
    /// Enrollment already accepted or rejected
    EnrollmentAlreadyDecided = 4002,
    /// Status transition not allowed by the lifecycle
    InvalidStatusTransition = 4003,
    /// Enrollment session not found
    SessionNotFound = 4101,
    /// Operation not valid in the session's current state
    SessionStateInvalid = 4102,
    /// Payment proof attachment required before submission
    ProofRequired = 4103,

    // ==================== 5xxx: Payment ====================
    /// Invalid payment method
    PaymentInvalidMethod = 5001,

    // ==================== 6xxx: Course ====================
    /// Course not found
    CourseNotFound = 6001,
    /// Course has invalid price
    CourseInvalidPrice = 6002,
    /// Enrollment field id not present in the field catalog
    UnknownFieldId = 6101,

    // ==================== 7xxx: Referral ====================
    /// Marketer assignment not found
    AssignmentNotFound = 7001,
    /// Marketer already assigned to this course
    AssignmentExists = 7002,
    /// Commission rate outside the allowed 1-50 range
    CommissionRateOutOfRange = 7003,
    /// Marketer not found
    MarketerNotFound = 7101,

    // ==================== 8xxx: Profile ====================
    /// Profile not found
    ProfileNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth / Permission
            ErrorCode::NotAuthenticated => "Caller is not authenticated",
            ErrorCode::PermissionDenied => "Permission denied",

            // Enrollment
            ErrorCode::EnrollmentNotFound => "Enrollment record not found",
            ErrorCode::EnrollmentAlreadyDecided => {
                "Enrollment has already been accepted or rejected"
            }
            ErrorCode::InvalidStatusTransition => "Status transition is not allowed",
            ErrorCode::SessionNotFound => "Enrollment session not found",
            ErrorCode::SessionStateInvalid => "Operation not valid in the current session state",
            ErrorCode::ProofRequired => "A payment proof attachment is required",

            // Payment
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            // Course
            ErrorCode::CourseNotFound => "Course not found",
            ErrorCode::CourseInvalidPrice => "Course has invalid price",
            ErrorCode::UnknownFieldId => "Enrollment field id is not in the catalog",

            // Referral
            ErrorCode::AssignmentNotFound => "Marketer assignment not found",
            ErrorCode::AssignmentExists => "Marketer is already assigned to this course",
            ErrorCode::CommissionRateOutOfRange => "Commission rate must be between 1 and 50",
            ErrorCode::MarketerNotFound => "Marketer not found",

            // Profile
            ErrorCode::ProfileNotFound => "Profile not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }

    /// Get the category this error code belongs to
    pub fn category(&self) -> super::ErrorCategory {
        super::ErrorCategory::from_code(self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,
            8 => Self::ValueOutOfRange,
            1001 => Self::NotAuthenticated,
            2001 => Self::PermissionDenied,
            4001 => Self::EnrollmentNotFound,
            4002 => Self::EnrollmentAlreadyDecided,
            4003 => Self::InvalidStatusTransition,
            4101 => Self::SessionNotFound,
            4102 => Self::SessionStateInvalid,
            4103 => Self::ProofRequired,
            5001 => Self::PaymentInvalidMethod,
            6001 => Self::CourseNotFound,
            6002 => Self::CourseInvalidPrice,
            6101 => Self::UnknownFieldId,
            7001 => Self::AssignmentNotFound,
            7002 => Self::AssignmentExists,
            7003 => Self::CommissionRateOutOfRange,
            7101 => Self::MarketerNotFound,
            8001 => Self::ProfileNotFound,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9005 => Self::ConfigError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
