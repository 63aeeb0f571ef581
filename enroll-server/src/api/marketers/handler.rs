//! Marketer API Handlers
//!
//! Dashboard read paths: marketer listing (assignment picker), commission
//! summary, and the tracking links a marketer shares.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::ServerState;
use crate::db::repository::{assignment, enrollment, profile};
use crate::referral::{enrollment_form_link, referral_link, summarize};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{CommissionSummary, Profile, Role};

/// GET /api/marketers - 所有已注册营销人员
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Profile>>> {
    let marketers = profile::find_by_role(&state.pool, Role::Marketer).await?;
    Ok(Json(marketers))
}

/// GET /api/marketers/{id}/commissions - 佣金汇总
///
/// settled 只统计 accepted 记录；pending/reserved 仅计入 estimated。
pub async fn commissions(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CommissionSummary>> {
    ensure_marketer(&state, &id).await?;

    let assignments = assignment::find_by_marketer(&state.pool, &id).await?;
    let records = enrollment::find_by_marketer(&state.pool, &id).await?;

    let summary = summarize(&id, &assignments, &records, state.config.currency_factor);
    Ok(Json(summary))
}

#[derive(serde::Deserialize)]
pub struct LinksQuery {
    /// Origin the links should point at, e.g. `https://masar.example`
    pub origin: String,
}

/// Tracking links for one assignment
#[derive(serde::Serialize)]
pub struct AssignmentLinks {
    pub assignment_id: i64,
    pub course_id: i64,
    pub course_title: String,
    /// Course landing link
    pub referral_link: String,
    /// Auto-opens the enrollment flow on arrival
    pub enrollment_form_link: String,
}

/// GET /api/marketers/{id}/links?origin=... - 推广链接列表
pub async fn links(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<LinksQuery>,
) -> AppResult<Json<Vec<AssignmentLinks>>> {
    ensure_marketer(&state, &id).await?;

    let assignments = assignment::find_by_marketer(&state.pool, &id).await?;
    let links = assignments
        .into_iter()
        .map(|a| AssignmentLinks {
            referral_link: referral_link(&query.origin, &id, a.course_id),
            enrollment_form_link: enrollment_form_link(&query.origin, &id, a.course_id),
            assignment_id: a.id,
            course_id: a.course_id,
            course_title: a.course_title,
        })
        .collect();
    Ok(Json(links))
}

async fn ensure_marketer(state: &ServerState, id: &str) -> AppResult<()> {
    profile::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.role == Role::Marketer)
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::MarketerNotFound, format!("Marketer {id} not found"))
        })?;
    Ok(())
}
