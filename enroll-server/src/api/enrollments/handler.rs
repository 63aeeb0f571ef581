//! Enrollment API Handlers
//!
//! The collaborator persistence contract consumed by dashboards: create,
//! list (by instructor or marketer), status transitions, administrative
//! deletion. Unlike the session write points, failures here are blocking.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::ServerState;
use crate::db::repository::enrollment;
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{EnrollmentCreate, EnrollmentRecord, EnrollmentStatusUpdate};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub instructor_id: Option<String>,
    pub marketer_id: Option<String>,
}

/// GET /api/enrollments - 报名记录列表 (按讲师或营销人员过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<EnrollmentRecord>>> {
    let records = match (&query.instructor_id, &query.marketer_id) {
        (Some(instructor_id), None) => {
            enrollment::find_by_instructor(&state.pool, instructor_id).await?
        }
        (None, Some(marketer_id)) => enrollment::find_by_marketer(&state.pool, marketer_id).await?,
        (None, None) => enrollment::find_all(&state.pool).await?,
        (Some(_), Some(_)) => {
            return Err(AppError::invalid_request(
                "Filter by instructor_id or marketer_id, not both",
            ));
        }
    };
    Ok(Json(records))
}

/// GET /api/enrollments/{id} - 获取单条报名记录
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EnrollmentRecord>> {
    let record = enrollment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| enrollment_not_found(id))?;
    Ok(Json(record))
}

/// POST /api/enrollments - 直接创建报名记录
///
/// 供非会话客户端使用；会话流程通过 /api/sessions 写入。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EnrollmentCreate>,
) -> AppResult<Json<EnrollmentRecord>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let record = enrollment::create(&state.pool, payload).await?;
    tracing::info!(
        enrollment_id = record.id,
        course_id = record.course_id,
        status = record.status.as_str(),
        "Enrollment record created"
    );
    Ok(Json(record))
}

/// PUT /api/enrollments/{id}/status - 状态流转 (讲师审核)
///
/// 生命周期只追加：reserved → pending → accepted | rejected。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EnrollmentStatusUpdate>,
) -> AppResult<Json<EnrollmentRecord>> {
    let current = enrollment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| enrollment_not_found(id))?;

    if current.status.is_decided() {
        return Err(AppError::with_message(
            ErrorCode::EnrollmentAlreadyDecided,
            format!("Enrollment {id} is already {}", current.status.as_str()),
        ));
    }
    if !current.status.can_transition_to(payload.status) {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!(
                "Cannot move enrollment {id} from {} to {}",
                current.status.as_str(),
                payload.status.as_str()
            ),
        ));
    }

    let record = enrollment::set_status(&state.pool, id, payload.status).await?;
    tracing::info!(
        enrollment_id = id,
        from = current.status.as_str(),
        to = record.status.as_str(),
        "Enrollment status updated"
    );
    Ok(Json(record))
}

/// DELETE /api/enrollments/{id} - 管理删除
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = enrollment::delete(&state.pool, id).await?;
    if !result {
        return Err(enrollment_not_found(id));
    }
    tracing::info!(enrollment_id = id, "Enrollment record deleted");
    Ok(Json(result))
}

fn enrollment_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::EnrollmentNotFound,
        format!("Enrollment {id} not found"),
    )
}
