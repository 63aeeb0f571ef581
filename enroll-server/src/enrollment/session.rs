//! Enrollment session state machine
//!
//! One session walks a learner from seat reservation through payment-proof
//! submission and produces exactly one enrollment record. The machine is
//! plain data plus transition methods; persistence happens outside, at the
//! two write points, and the outcome is applied back via
//! [`EnrollmentSession::apply_write_result`]. A failed write never blocks
//! the learner-visible flow; callers that care about durability read
//! [`WriteOutcome`] off the session.

use serde::Serialize;
use shared::models::{Course, EnrollmentCreate, EnrollmentRecord, EnrollmentStatus, PaymentMethod};
use std::collections::HashMap;

use super::fields::{resolve_course_fields, FieldView, ResolvedField};
use super::validation::{validate_form, validation_error};
use crate::db::repository::RepoError;
use crate::referral::commission::local_amount;
use crate::referral::token::ReferralToken;
use crate::utils::validation::{validate_optional_text, MAX_NOTE_LEN};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Session states
///
/// ```text
/// collecting-details ──(pay later)──────────────────────► done
///        │                                                 ▲
///        └─► choosing-payment-method ─► bank-instructions ─┤
///                    │            ▲  └► momo-instructions ─┤ (via uploading-proof)
///                    ▼            │            │           │
///              (back to details)  └────────── uploading-proof
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    CollectingDetails,
    ChoosingPaymentMethod,
    BankInstructions,
    MomoInstructions,
    UploadingProof,
    Done,
}

/// Outcome of the most recent durable-write attempt
///
/// The learner-facing completion signal is the `done` state; durability is
/// reported separately so reconciliation can pick up failed writes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum WriteOutcome {
    Persisted { record_id: i64 },
    Failed { reason: String },
}

/// Static bank transfer target shown in the bank-instructions state
#[derive(Debug, Clone, Serialize)]
pub struct BankTransferTarget {
    pub bank: &'static str,
    pub account_name: &'static str,
    pub account_number: &'static str,
}

pub const BANK_TRANSFER_TARGET: BankTransferTarget = BankTransferTarget {
    bank: "Bank of Khartoum",
    account_name: "Masar Training Platform",
    account_number: "1234-5678-9012-3456",
};

/// Mobile money operator shown in the momo-instructions state
#[derive(Debug, Clone, Serialize)]
pub struct MomoProvider {
    pub id: &'static str,
    pub name: &'static str,
    pub number: &'static str,
}

pub const MOMO_PROVIDERS: &[MomoProvider] = &[
    MomoProvider { id: "mtn", name: "MTN", number: "0910-123-456" },
    MomoProvider { id: "zain", name: "Zain", number: "0912-987-654" },
    MomoProvider { id: "sudani", name: "Sudani", number: "0911-555-777" },
];

/// What the store should persist when proof is submitted
#[derive(Debug)]
pub enum ProofWrite {
    /// First durable write of this session
    Create(EnrollmentCreate),
    /// Pay-later restart: move the already-written reserved record forward
    Complete {
        record_id: i64,
        payment: PaymentMethod,
        note: Option<String>,
    },
}

/// One learner's enrollment interaction with one course
#[derive(Debug)]
pub struct EnrollmentSession {
    pub id: String,
    course_id: i64,
    instructor_id: String,
    /// Course price at session start, in the base currency unit
    price: f64,
    currency_factor: i64,
    fields: Vec<ResolvedField>,
    state: SessionState,
    pay_later: bool,
    method: Option<PaymentMethod>,
    form: HashMap<String, String>,
    note: Option<String>,
    proof: Option<String>,
    referral: Option<ReferralToken>,
    record_id: Option<i64>,
    reference: String,
    last_write: Option<WriteOutcome>,
    created_at: i64,
}

impl EnrollmentSession {
    /// Build a session for a course. The referral token is passed explicitly
    /// here; nothing reads ambient storage later.
    pub fn new(course: &Course, referral: Option<ReferralToken>, currency_factor: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            course_id: course.id,
            instructor_id: course.instructor_id.clone(),
            price: course.price,
            currency_factor,
            fields: resolve_course_fields(&course.enrollment_fields),
            state: SessionState::CollectingDetails,
            pay_later: false,
            method: None,
            form: HashMap::new(),
            note: None,
            proof: None,
            referral,
            record_id: None,
            reference: shared::util::enrollment_reference(course.id),
            last_write: None,
            created_at: shared::util::now_millis(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn record_id(&self) -> Option<i64> {
        self.record_id
    }

    pub fn last_write(&self) -> Option<&WriteOutcome> {
        self.last_write.as_ref()
    }

    fn expect_state(&self, expected: SessionState) -> AppResult<()> {
        if self.state != expected {
            return Err(AppError::with_message(
                ErrorCode::SessionStateInvalid,
                format!("Expected {:?} state, session is {:?}", expected, self.state),
            ));
        }
        Ok(())
    }

    /// Submit the learner's details, choosing pay-now or pay-later.
    ///
    /// Validation failures leave the session in collecting-details with no
    /// partial save. Pay-later returns the reserved-record payload for the
    /// store; pay-now moves on to method selection with no write.
    pub fn submit_details(
        &mut self,
        form: HashMap<String, String>,
        pay_later: bool,
    ) -> AppResult<Option<EnrollmentCreate>> {
        self.expect_state(SessionState::CollectingDetails)?;
        if let Err(errors) = validate_form(&self.fields, &form) {
            return Err(validation_error(errors));
        }
        self.form = form;
        self.pay_later = pay_later;

        if pay_later {
            self.state = SessionState::Done;
            Ok(Some(self.build_create(EnrollmentStatus::Reserved, PaymentMethod::NoneYet)))
        } else {
            self.state = SessionState::ChoosingPaymentMethod;
            Ok(None)
        }
    }

    /// Pick bank transfer or mobile money. No side effects.
    pub fn choose_method(&mut self, method: PaymentMethod) -> AppResult<()> {
        self.expect_state(SessionState::ChoosingPaymentMethod)?;
        self.state = match method {
            PaymentMethod::Bank => SessionState::BankInstructions,
            PaymentMethod::Momo => SessionState::MomoInstructions,
            PaymentMethod::NoneYet => {
                return Err(AppError::new(ErrorCode::PaymentInvalidMethod));
            }
        };
        self.method = Some(method);
        Ok(())
    }

    /// "I've paid" from an instructions state.
    pub fn confirm_transferred(&mut self) -> AppResult<()> {
        match self.state {
            SessionState::BankInstructions | SessionState::MomoInstructions => {
                self.state = SessionState::UploadingProof;
                Ok(())
            }
            _ => Err(AppError::with_message(
                ErrorCode::SessionStateInvalid,
                format!("Cannot confirm transfer from {:?}", self.state),
            )),
        }
    }

    /// Step one screen back. Never has side effects.
    pub fn back(&mut self) -> AppResult<()> {
        self.state = match self.state {
            SessionState::ChoosingPaymentMethod => SessionState::CollectingDetails,
            SessionState::BankInstructions | SessionState::MomoInstructions => {
                SessionState::ChoosingPaymentMethod
            }
            SessionState::UploadingProof => match self.method {
                Some(PaymentMethod::Momo) => SessionState::MomoInstructions,
                _ => SessionState::BankInstructions,
            },
            other => {
                return Err(AppError::with_message(
                    ErrorCode::SessionStateInvalid,
                    format!("Cannot go back from {:?}", other),
                ));
            }
        };
        Ok(())
    }

    /// Attach the payment receipt (and optional note to the instructor).
    pub fn attach_proof(&mut self, file_name: String, note: Option<String>) -> AppResult<()> {
        self.expect_state(SessionState::UploadingProof)?;
        if file_name.trim().is_empty() {
            return Err(AppError::validation("Receipt file name must not be empty"));
        }
        validate_optional_text(&note, "note", MAX_NOTE_LEN)?;
        self.proof = Some(file_name);
        if note.is_some() {
            self.note = note;
        }
        Ok(())
    }

    /// Submit the attached proof, producing the write for the store.
    ///
    /// A session that already wrote its reserved record returns a
    /// `Complete` update (the one-record-per-session invariant); only a
    /// session with no durable record yet returns a `Create`.
    pub fn submit_proof(&mut self) -> AppResult<ProofWrite> {
        self.expect_state(SessionState::UploadingProof)?;
        if self.proof.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return Err(AppError::new(ErrorCode::ProofRequired));
        }
        let payment = self
            .method
            .ok_or_else(|| AppError::new(ErrorCode::PaymentInvalidMethod))?;

        self.state = SessionState::Done;
        match self.record_id {
            Some(record_id) => Ok(ProofWrite::Complete {
                record_id,
                payment,
                note: self.note.clone(),
            }),
            None => Ok(ProofWrite::Create(self.build_create(EnrollmentStatus::Pending, payment))),
        }
    }

    /// From the reserved confirmation screen, re-enter payment selection.
    /// The record id is kept so the eventual submission updates in place.
    pub fn restart_payment(&mut self) -> AppResult<()> {
        self.expect_state(SessionState::Done)?;
        if !self.pay_later {
            return Err(AppError::with_message(
                ErrorCode::SessionStateInvalid,
                "Session has already submitted payment",
            ));
        }
        self.pay_later = false;
        self.state = SessionState::ChoosingPaymentMethod;
        Ok(())
    }

    /// Apply the store's write result back onto the session.
    ///
    /// Success consumes the referral token (one link, one attribution) and
    /// pins the record id; failure is warn-logged and recorded, and the
    /// session stays where the transition put it.
    pub fn apply_write_result(&mut self, result: Result<EnrollmentRecord, RepoError>) {
        match result {
            Ok(record) => {
                self.record_id = Some(record.id);
                self.referral = None;
                self.last_write = Some(WriteOutcome::Persisted { record_id: record.id });
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %self.id,
                    error = %e,
                    "Enrollment write failed, session continues without a durable record"
                );
                self.last_write = Some(WriteOutcome::Failed {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn build_create(&self, status: EnrollmentStatus, payment: PaymentMethod) -> EnrollmentCreate {
        EnrollmentCreate {
            course_id: self.course_id,
            instructor_id: self.instructor_id.clone(),
            name: self.form.get("full_name").cloned().unwrap_or_default(),
            phone: self.form.get("phone").cloned().unwrap_or_default(),
            email: self
                .form
                .get("email")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            payment,
            amount: self.price,
            status,
            reference: Some(self.reference.clone()),
            note: self.note.clone(),
            fields: self.form.clone(),
            marketer_id: self.referral.as_ref().map(|t| t.marketer_id.clone()),
        }
    }

    /// Client-facing snapshot of the session
    pub fn view(&self) -> SessionView {
        let in_bank = self.state == SessionState::BankInstructions;
        let in_momo = self.state == SessionState::MomoInstructions;
        SessionView {
            id: self.id.clone(),
            state: self.state,
            course_id: self.course_id,
            reference: self.reference.clone(),
            amount: self.price,
            local_amount: local_amount(self.price, self.currency_factor),
            pay_later: self.pay_later,
            method: self.method,
            proof: self.proof.clone(),
            record_id: self.record_id,
            last_write: self.last_write.clone(),
            fields: self.fields.iter().map(FieldView::from).collect(),
            bank: in_bank.then_some(&BANK_TRANSFER_TARGET),
            momo_providers: in_momo.then_some(MOMO_PROVIDERS),
            created_at: self.created_at,
        }
    }
}

/// Serializable session snapshot returned by the session API
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: String,
    pub state: SessionState,
    pub course_id: i64,
    pub reference: String,
    /// Amount in the base currency unit
    pub amount: f64,
    /// Amount converted to the local currency, whole units
    pub local_amount: i64,
    pub pay_later: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_write: Option<WriteOutcome>,
    pub fields: Vec<FieldView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<&'static BankTransferTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momo_providers: Option<&'static [MomoProvider]>,
    pub created_at: i64,
}
