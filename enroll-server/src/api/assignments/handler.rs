//! Marketer Assignment API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::ServerState;
use crate::db::repository::{assignment, course, profile};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    AssignmentCreate, MarketerAssignment, Role, MAX_COMMISSION_RATE, MIN_COMMISSION_RATE,
};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub instructor_id: Option<String>,
    pub marketer_id: Option<String>,
}

/// GET /api/assignments - 分配列表 (按讲师或营销人员过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MarketerAssignment>>> {
    let assignments = match (&query.instructor_id, &query.marketer_id) {
        (Some(instructor_id), None) => {
            assignment::find_by_instructor(&state.pool, instructor_id).await?
        }
        (None, Some(marketer_id)) => assignment::find_by_marketer(&state.pool, marketer_id).await?,
        _ => {
            return Err(AppError::invalid_request(
                "Provide exactly one of instructor_id or marketer_id",
            ));
        }
    };
    Ok(Json(assignments))
}

/// POST /api/assignments - 讲师将课程分配给营销人员
///
/// 营销人员必须存在于 profiles 且角色为 marketer；同一 (课程, 营销人员)
/// 组合重复创建会被拒绝 — 调整佣金率需先撤销再重新分配。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AssignmentCreate>,
) -> AppResult<Json<MarketerAssignment>> {
    if !(MIN_COMMISSION_RATE..=MAX_COMMISSION_RATE).contains(&payload.commission_rate) {
        return Err(AppError::with_message(
            ErrorCode::CommissionRateOutOfRange,
            format!(
                "Commission rate must be between {MIN_COMMISSION_RATE} and {MAX_COMMISSION_RATE}, got {}",
                payload.commission_rate
            ),
        ));
    }

    let course = course::find_by_id(&state.pool, payload.course_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CourseNotFound,
                format!("Course {} not found", payload.course_id),
            )
        })?;

    // No optimistic write: a marketer id without a profile row is rejected
    let marketer = profile::find_by_id(&state.pool, &payload.marketer_id)
        .await?
        .filter(|p| p.role == Role::Marketer)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MarketerNotFound,
                format!("Marketer {} not found", payload.marketer_id),
            )
        })?;

    if assignment::find_by_course_and_marketer(&state.pool, course.id, &marketer.id)
        .await?
        .is_some()
    {
        return Err(AppError::with_message(
            ErrorCode::AssignmentExists,
            format!(
                "Marketer {} is already assigned to course {}",
                marketer.id, course.id
            ),
        ));
    }

    let created = assignment::create(
        &state.pool,
        course.id,
        &payload.instructor_id,
        &marketer.id,
        &marketer.name,
        &marketer.email,
        &course.title,
        payload.commission_rate,
    )
    .await?;

    tracing::info!(
        assignment_id = created.id,
        course_id = created.course_id,
        marketer_id = %created.marketer_id,
        rate = created.commission_rate,
        "Marketer assignment created"
    );
    Ok(Json(created))
}

/// DELETE /api/assignments/{id} - 撤销分配
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = assignment::delete(&state.pool, id).await?;
    if !result {
        return Err(AppError::with_message(
            ErrorCode::AssignmentNotFound,
            format!("Assignment {id} not found"),
        ));
    }
    tracing::info!(assignment_id = id, "Marketer assignment revoked");
    Ok(Json(result))
}
