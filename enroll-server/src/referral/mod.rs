//! Referral attribution and commission bookkeeping

pub mod commission;
pub mod token;

pub use commission::{commission_for, local_amount, summarize};
pub use token::{enrollment_form_link, referral_link, ReferralToken};
