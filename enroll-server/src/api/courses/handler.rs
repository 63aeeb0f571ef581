//! Course API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::ServerState;
use crate::db::repository::course;
use crate::enrollment::fields::{resolve_course_fields, FieldView};
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Course, CourseCreate, CourseUpdate};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub instructor_id: Option<String>,
}

/// GET /api/courses - 获取课程列表 (可按讲师过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Course>>> {
    let courses = match query.instructor_id {
        Some(instructor_id) => course::find_by_instructor(&state.pool, &instructor_id).await?,
        None => course::find_all(&state.pool).await?,
    };
    Ok(Json(courses))
}

/// GET /api/courses/{id} - 获取单个课程
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Course>> {
    let course = course::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| course_not_found(id))?;
    Ok(Json(course))
}

/// GET /api/courses/{id}/fields - 获取课程的报名字段渲染列表
///
/// 未知字段 id 在解析时被跳过 (warn 日志)，锁定字段始终在列表中。
pub async fn fields(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<FieldView>>> {
    let course = course::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| course_not_found(id))?;
    let resolved = resolve_course_fields(&course.enrollment_fields);
    Ok(Json(resolved.iter().map(FieldView::from).collect()))
}

/// POST /api/courses - 创建课程
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CourseCreate>,
) -> AppResult<Json<Course>> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_price(payload.price)?;

    let course = course::create(&state.pool, payload).await?;
    tracing::info!(course_id = course.id, "Course created");
    Ok(Json(course))
}

/// PUT /api/courses/{id} - 更新课程
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CourseUpdate>,
) -> AppResult<Json<Course>> {
    if let Some(title) = &payload.title {
        validate_required_text(title, "title", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    course::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| course_not_found(id))?;

    let course = course::update(&state.pool, id, payload).await?;
    Ok(Json(course))
}

/// DELETE /api/courses/{id} - 删除课程
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = course::delete(&state.pool, id).await?;
    if !result {
        return Err(course_not_found(id));
    }
    tracing::info!(course_id = id, "Course deleted");
    Ok(Json(result))
}

fn course_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CourseNotFound, format!("Course {id} not found"))
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::CourseInvalidPrice,
            format!("Course price must be a positive amount, got {price}"),
        ));
    }
    Ok(())
}
