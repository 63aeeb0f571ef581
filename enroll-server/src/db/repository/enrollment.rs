//! Enrollment Request Repository
//!
//! `amount` and `course_id` are fixed at insert time; updates only ever
//! touch payment, note and status.

use super::{RepoError, RepoResult};
use shared::models::{EnrollmentCreate, EnrollmentRecord, EnrollmentStatus, PaymentMethod};
use sqlx::SqlitePool;
use std::collections::HashMap;

const ENROLLMENT_SELECT: &str = "SELECT id, course_id, instructor_id, name, phone, email, payment, amount, status, reference, note, fields, marketer_id, created_at, updated_at FROM enrollment_request";

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    id: i64,
    course_id: i64,
    instructor_id: String,
    name: String,
    phone: String,
    email: Option<String>,
    payment: String,
    amount: f64,
    status: String,
    reference: String,
    note: Option<String>,
    fields: String,
    marketer_id: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl EnrollmentRow {
    fn into_record(self) -> RepoResult<EnrollmentRecord> {
        let payment: PaymentMethod = self
            .payment
            .parse()
            .map_err(|e: String| RepoError::Database(e))?;
        let status: EnrollmentStatus = self
            .status
            .parse()
            .map_err(|e: String| RepoError::Database(e))?;
        let fields: HashMap<String, String> = serde_json::from_str(&self.fields)
            .map_err(|e| RepoError::Database(format!("Corrupt fields map: {e}")))?;
        Ok(EnrollmentRecord {
            id: self.id,
            course_id: self.course_id,
            instructor_id: self.instructor_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            payment,
            amount: self.amount,
            status,
            reference: self.reference,
            note: self.note,
            fields,
            marketer_id: self.marketer_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<EnrollmentRecord>> {
    let sql = format!("{ENROLLMENT_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, EnrollmentRow>(&sql)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(EnrollmentRow::into_record).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<EnrollmentRecord>> {
    let sql = format!("{ENROLLMENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, EnrollmentRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(EnrollmentRow::into_record).transpose()
}

pub async fn find_by_instructor(
    pool: &SqlitePool,
    instructor_id: &str,
) -> RepoResult<Vec<EnrollmentRecord>> {
    let sql = format!("{ENROLLMENT_SELECT} WHERE instructor_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, EnrollmentRow>(&sql)
        .bind(instructor_id)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(EnrollmentRow::into_record).collect()
}

pub async fn find_by_marketer(
    pool: &SqlitePool,
    marketer_id: &str,
) -> RepoResult<Vec<EnrollmentRecord>> {
    let sql = format!("{ENROLLMENT_SELECT} WHERE marketer_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, EnrollmentRow>(&sql)
        .bind(marketer_id)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(EnrollmentRow::into_record).collect()
}

pub async fn create(pool: &SqlitePool, data: EnrollmentCreate) -> RepoResult<EnrollmentRecord> {
    // Records enter the lifecycle at reserved or pending only
    if data.status.is_decided() {
        return Err(RepoError::Validation(format!(
            "Enrollment cannot be created as {}",
            data.status.as_str()
        )));
    }
    if !data.amount.is_finite() || data.amount < 0.0 {
        return Err(RepoError::Validation(format!(
            "Invalid enrollment amount: {}",
            data.amount
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let reference = data
        .reference
        .clone()
        .unwrap_or_else(|| shared::util::enrollment_reference(data.course_id));
    let fields = serde_json::to_string(&data.fields)
        .map_err(|e| RepoError::Database(format!("Failed to encode fields map: {e}")))?;

    sqlx::query(
        "INSERT INTO enrollment_request (id, course_id, instructor_id, name, phone, email, payment, amount, status, reference, note, fields, marketer_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)",
    )
    .bind(id)
    .bind(data.course_id)
    .bind(&data.instructor_id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(data.payment.as_str())
    .bind(data.amount)
    .bind(data.status.as_str())
    .bind(&reference)
    .bind(&data.note)
    .bind(fields)
    .bind(&data.marketer_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create enrollment".into()))
}

/// Set the lifecycle status. Callers are responsible for checking the
/// transition table first; this only touches the row.
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    status: EnrollmentStatus,
) -> RepoResult<EnrollmentRecord> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE enrollment_request SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status.as_str())
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Enrollment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Enrollment {id} not found")))
}

/// Complete a reserved enrollment: attach the chosen payment method (and
/// note, when given) and move the record to pending. Guarded so a record
/// that already left `reserved` is never overwritten.
pub async fn complete_payment(
    pool: &SqlitePool,
    id: i64,
    payment: PaymentMethod,
    note: Option<&str>,
) -> RepoResult<EnrollmentRecord> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE enrollment_request SET payment = ?1, note = COALESCE(?2, note), status = 'pending', updated_at = ?3 WHERE id = ?4 AND status = 'reserved'",
    )
    .bind(payment.as_str())
    .bind(note)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, id).await? {
            Some(record) => Err(RepoError::Validation(format!(
                "Enrollment {id} is {}, not reserved",
                record.status.as_str()
            ))),
            None => Err(RepoError::NotFound(format!("Enrollment {id} not found"))),
        };
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Enrollment {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM enrollment_request WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
