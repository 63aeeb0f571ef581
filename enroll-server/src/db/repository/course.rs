//! Course Repository

use super::{RepoError, RepoResult};
use shared::models::{default_enrollment_fields, Course, CourseCreate, CourseFieldConfig, CourseUpdate};
use sqlx::SqlitePool;

const COURSE_SELECT: &str = "SELECT id, instructor_id, title, price, mode, enrollment_fields, created_at, updated_at FROM course";

/// Raw course row. `mode` and `enrollment_fields` are TEXT columns decoded
/// into their typed forms on the way out.
#[derive(sqlx::FromRow)]
struct CourseRow {
    id: i64,
    instructor_id: String,
    title: String,
    price: f64,
    mode: String,
    enrollment_fields: String,
    created_at: i64,
    updated_at: i64,
}

impl CourseRow {
    fn into_course(self) -> RepoResult<Course> {
        let mode = self
            .mode
            .parse()
            .map_err(|e: String| RepoError::Database(e))?;
        let enrollment_fields: Vec<CourseFieldConfig> =
            serde_json::from_str(&self.enrollment_fields)
                .map_err(|e| RepoError::Database(format!("Corrupt enrollment_fields: {e}")))?;
        Ok(Course {
            id: self.id,
            instructor_id: self.instructor_id,
            title: self.title,
            price: self.price,
            mode,
            enrollment_fields,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn encode_fields(fields: &[CourseFieldConfig]) -> RepoResult<String> {
    serde_json::to_string(fields)
        .map_err(|e| RepoError::Database(format!("Failed to encode enrollment_fields: {e}")))
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Course>> {
    let sql = format!("{COURSE_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, CourseRow>(&sql).fetch_all(pool).await?;
    rows.into_iter().map(CourseRow::into_course).collect()
}

pub async fn find_by_instructor(pool: &SqlitePool, instructor_id: &str) -> RepoResult<Vec<Course>> {
    let sql = format!("{COURSE_SELECT} WHERE instructor_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, CourseRow>(&sql)
        .bind(instructor_id)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(CourseRow::into_course).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Course>> {
    let sql = format!("{COURSE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, CourseRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(CourseRow::into_course).transpose()
}

pub async fn create(pool: &SqlitePool, data: CourseCreate) -> RepoResult<Course> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let fields = if data.enrollment_fields.is_empty() {
        default_enrollment_fields()
    } else {
        data.enrollment_fields
    };
    sqlx::query(
        "INSERT INTO course (id, instructor_id, title, price, mode, enrollment_fields, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.instructor_id)
    .bind(&data.title)
    .bind(data.price)
    .bind(data.mode.as_str())
    .bind(encode_fields(&fields)?)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create course".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CourseUpdate) -> RepoResult<Course> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Course {id} not found")))?;

    let now = shared::util::now_millis();
    let title = data.title.unwrap_or(current.title);
    let price = data.price.unwrap_or(current.price);
    let mode = data.mode.unwrap_or(current.mode);
    let fields = data.enrollment_fields.unwrap_or(current.enrollment_fields);

    sqlx::query(
        "UPDATE course SET title = ?1, price = ?2, mode = ?3, enrollment_fields = ?4, updated_at = ?5 WHERE id = ?6",
    )
    .bind(&title)
    .bind(price)
    .bind(mode.as_str())
    .bind(encode_fields(&fields)?)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Course {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM course WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
