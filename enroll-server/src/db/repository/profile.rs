//! Profile Repository

use super::{RepoError, RepoResult};
use shared::models::{Profile, ProfileCreate, Role};
use sqlx::SqlitePool;

const PROFILE_SELECT: &str = "SELECT id, name, email, role, created_at FROM profile";

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Profile>> {
    let sql = format!("{PROFILE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Profile>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_role(pool: &SqlitePool, role: Role) -> RepoResult<Vec<Profile>> {
    let sql = format!("{PROFILE_SELECT} WHERE role = ? ORDER BY created_at ASC");
    let rows = sqlx::query_as::<_, Profile>(&sql)
        .bind(role.as_str())
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: ProfileCreate) -> RepoResult<Profile> {
    let now = shared::util::now_millis();
    sqlx::query("INSERT INTO profile (id, name, email, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)")
        .bind(&data.id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(data.role.as_str())
        .bind(now)
        .execute(pool)
        .await?;
    find_by_id(pool, &data.id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create profile".into()))
}
