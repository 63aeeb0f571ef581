//! Shared types for the enrollment platform
//!
//! Common types used across crates: data models, the unified error
//! system, and small utilities (ID and timestamp generation).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
