//! Referral tracking tokens
//!
//! A marketer's shared link carries plain, unauthenticated query parameters
//! (`ref`, `course`, `enroll`). The parsed token is handed to the enrollment
//! session at construction and attributes exactly one record.

use serde::{Deserialize, Serialize};

/// Attribution captured from an incoming tracking link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralToken {
    /// Opaque marketer identifier
    pub marketer_id: String,
    /// Course the link points at, when present
    pub course_id: Option<i64>,
    /// `enroll=1`: open the enrollment flow immediately on arrival
    pub auto_enroll: bool,
}

impl ReferralToken {
    /// Parse a tracking link query string (`ref=M1&course=7&enroll=1`).
    ///
    /// Returns `None` when no `ref` parameter is present; a link without a
    /// marketer id carries no attribution.
    pub fn from_query(query: &str) -> Option<Self> {
        let mut marketer_id = None;
        let mut course_id = None;
        let mut auto_enroll = false;

        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "ref" if !value.is_empty() => marketer_id = Some(value.to_string()),
                "course" => course_id = value.parse().ok(),
                "enroll" => auto_enroll = value == "1",
                _ => {}
            }
        }

        Some(Self {
            marketer_id: marketer_id?,
            course_id,
            auto_enroll,
        })
    }
}

/// Course landing link for a marketer
pub fn referral_link(origin: &str, marketer_id: &str, course_id: i64) -> String {
    format!(
        "{}/?ref={}&course={}",
        origin.trim_end_matches('/'),
        marketer_id,
        course_id
    )
}

/// Direct enrollment link that opens the enrollment flow on arrival
pub fn enrollment_form_link(origin: &str, marketer_id: &str, course_id: i64) -> String {
    format!("{}&enroll=1", referral_link(origin, marketer_id, course_id))
}
