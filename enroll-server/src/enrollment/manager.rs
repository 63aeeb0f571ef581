//! SessionManager - holds live enrollment sessions and drives persistence
//!
//! Sessions are in-memory only; the two record-write points are the only
//! durable side effects. Each session sits behind its own async mutex so a
//! slow write on one session never blocks another.

use dashmap::DashMap;
use shared::models::PaymentMethod;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::session::{EnrollmentSession, ProofWrite, SessionView};
use crate::db::repository::{course, enrollment};
use crate::referral::token::ReferralToken;
use crate::utils::{AppError, AppResult, ErrorCode};

pub struct SessionManager {
    pool: SqlitePool,
    currency_factor: i64,
    sessions: DashMap<String, Arc<Mutex<EnrollmentSession>>>,
}

impl SessionManager {
    pub fn new(pool: SqlitePool, currency_factor: i64) -> Self {
        Self {
            pool,
            currency_factor,
            sessions: DashMap::new(),
        }
    }

    /// Start a session for a course, optionally carrying a referral token
    /// captured from a tracking link.
    pub async fn start(
        &self,
        course_id: i64,
        referral: Option<ReferralToken>,
    ) -> AppResult<SessionView> {
        let course = course::find_by_id(&self.pool, course_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::CourseNotFound,
                    format!("Course {course_id} not found"),
                )
            })?;

        let session = EnrollmentSession::new(&course, referral, self.currency_factor);
        let view = session.view();
        tracing::info!(session_id = %view.id, course_id, "Enrollment session started");
        self.sessions
            .insert(view.id.clone(), Arc::new(Mutex::new(session)));
        Ok(view)
    }

    fn session(&self, id: &str) -> AppResult<Arc<Mutex<EnrollmentSession>>> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::SessionNotFound, format!("Session {id} not found"))
            })
    }

    pub async fn view(&self, id: &str) -> AppResult<SessionView> {
        let session = self.session(id)?;
        let session = session.lock().await;
        Ok(session.view())
    }

    /// Details submit. The pay-later branch writes the reserved record.
    pub async fn submit_details(
        &self,
        id: &str,
        form: HashMap<String, String>,
        pay_later: bool,
    ) -> AppResult<SessionView> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        if let Some(create) = session.submit_details(form, pay_later)? {
            let result = enrollment::create(&self.pool, create).await;
            session.apply_write_result(result);
        }
        Ok(session.view())
    }

    pub async fn choose_method(&self, id: &str, method: PaymentMethod) -> AppResult<SessionView> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.choose_method(method)?;
        Ok(session.view())
    }

    pub async fn confirm_transferred(&self, id: &str) -> AppResult<SessionView> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.confirm_transferred()?;
        Ok(session.view())
    }

    pub async fn back(&self, id: &str) -> AppResult<SessionView> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.back()?;
        Ok(session.view())
    }

    pub async fn attach_proof(
        &self,
        id: &str,
        file_name: String,
        note: Option<String>,
    ) -> AppResult<SessionView> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.attach_proof(file_name, note)?;
        Ok(session.view())
    }

    /// Proof submit, the second write point. A reserved session updates its
    /// existing record; everything else creates the record at pending.
    pub async fn submit_proof(&self, id: &str) -> AppResult<SessionView> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        let write = session.submit_proof()?;
        let result = match write {
            ProofWrite::Create(create) => enrollment::create(&self.pool, create).await,
            ProofWrite::Complete {
                record_id,
                payment,
                note,
            } => enrollment::complete_payment(&self.pool, record_id, payment, note.as_deref()).await,
        };
        session.apply_write_result(result);
        Ok(session.view())
    }

    pub async fn restart_payment(&self, id: &str) -> AppResult<SessionView> {
        let session = self.session(id)?;
        let mut session = session.lock().await;
        session.restart_payment()?;
        Ok(session.view())
    }

    /// Drop a session from memory (tab closed, flow abandoned).
    pub fn discard(&self, id: &str) -> AppResult<()> {
        self.sessions.remove(id).map(|_| ()).ok_or_else(|| {
            AppError::with_message(ErrorCode::SessionNotFound, format!("Session {id} not found"))
        })
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
