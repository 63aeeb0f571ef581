//! Marketer Assignment Repository

use super::{RepoError, RepoResult};
use shared::models::MarketerAssignment;
use sqlx::SqlitePool;

const ASSIGNMENT_SELECT: &str = "SELECT id, course_id, instructor_id, marketer_id, marketer_name, marketer_email, course_title, commission_rate, created_at FROM marketer_assignment";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MarketerAssignment>> {
    let sql = format!("{ASSIGNMENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, MarketerAssignment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_instructor(
    pool: &SqlitePool,
    instructor_id: &str,
) -> RepoResult<Vec<MarketerAssignment>> {
    let sql = format!("{ASSIGNMENT_SELECT} WHERE instructor_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, MarketerAssignment>(&sql)
        .bind(instructor_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_marketer(
    pool: &SqlitePool,
    marketer_id: &str,
) -> RepoResult<Vec<MarketerAssignment>> {
    let sql = format!("{ASSIGNMENT_SELECT} WHERE marketer_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, MarketerAssignment>(&sql)
        .bind(marketer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_course_and_marketer(
    pool: &SqlitePool,
    course_id: i64,
    marketer_id: &str,
) -> RepoResult<Option<MarketerAssignment>> {
    let sql = format!("{ASSIGNMENT_SELECT} WHERE course_id = ? AND marketer_id = ?");
    let row = sqlx::query_as::<_, MarketerAssignment>(&sql)
        .bind(course_id)
        .bind(marketer_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a new assignment. The denormalized marketer/course columns are
/// resolved by the caller; the UNIQUE (course_id, marketer_id) constraint
/// backs the one-active-rate-per-pair invariant.
pub async fn create(
    pool: &SqlitePool,
    course_id: i64,
    instructor_id: &str,
    marketer_id: &str,
    marketer_name: &str,
    marketer_email: &str,
    course_title: &str,
    commission_rate: i64,
) -> RepoResult<MarketerAssignment> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let result = sqlx::query(
        "INSERT INTO marketer_assignment (id, course_id, instructor_id, marketer_id, marketer_name, marketer_email, course_title, commission_rate, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(course_id)
    .bind(instructor_id)
    .bind(marketer_id)
    .bind(marketer_name)
    .bind(marketer_email)
    .bind(course_title)
    .bind(commission_rate)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(e) => {
            let repo_err = RepoError::from(e);
            return match repo_err {
                RepoError::Duplicate(_) => Err(RepoError::Duplicate(format!(
                    "Marketer {marketer_id} already assigned to course {course_id}"
                ))),
                other => Err(other),
            };
        }
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create assignment".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM marketer_assignment WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
