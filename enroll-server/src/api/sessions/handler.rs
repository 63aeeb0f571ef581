//! Enrollment Session API Handlers
//!
//! Each endpoint drives one transition of the session state machine. The
//! referral token is parsed from the raw tracking-link query at session
//! start and handed to the session explicitly, not read from ambient state.

use axum::{
    extract::{Path, State},
    Json,
};
use std::collections::HashMap;

use crate::core::ServerState;
use crate::enrollment::SessionView;
use crate::referral::ReferralToken;
use crate::utils::AppResult;
use shared::models::PaymentMethod;

#[derive(serde::Deserialize)]
pub struct StartSession {
    pub course_id: i64,
    /// Raw query string of the tracking link that brought the learner here
    /// (`ref=M1&course=7&enroll=1`), when there was one.
    pub referral_query: Option<String>,
}

/// POST /api/sessions - 开始报名会话
pub async fn start(
    State(state): State<ServerState>,
    Json(payload): Json<StartSession>,
) -> AppResult<Json<SessionView>> {
    let referral = payload
        .referral_query
        .as_deref()
        .and_then(ReferralToken::from_query);
    let view = state.sessions.start(payload.course_id, referral).await?;
    Ok(Json(view))
}

/// GET /api/sessions/{id} - 会话快照
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.sessions.view(&id).await?))
}

#[derive(serde::Deserialize)]
pub struct SubmitDetails {
    #[serde(default)]
    pub form: HashMap<String, String>,
    #[serde(default)]
    pub pay_later: bool,
}

/// POST /api/sessions/{id}/details - 提交报名表单 (立付或预留)
pub async fn submit_details(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SubmitDetails>,
) -> AppResult<Json<SessionView>> {
    let view = state
        .sessions
        .submit_details(&id, payload.form, payload.pay_later)
        .await?;
    Ok(Json(view))
}

#[derive(serde::Deserialize)]
pub struct ChooseMethod {
    pub method: PaymentMethod,
}

/// POST /api/sessions/{id}/method - 选择支付方式
pub async fn choose_method(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ChooseMethod>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.sessions.choose_method(&id, payload.method).await?))
}

/// POST /api/sessions/{id}/transferred - "我已转账"
pub async fn confirm_transferred(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.sessions.confirm_transferred(&id).await?))
}

/// POST /api/sessions/{id}/back - 返回上一步
pub async fn back(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.sessions.back(&id).await?))
}

#[derive(serde::Deserialize)]
pub struct AttachProof {
    pub file_name: String,
    pub note: Option<String>,
}

/// POST /api/sessions/{id}/proof - 附上支付凭证
pub async fn attach_proof(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AttachProof>,
) -> AppResult<Json<SessionView>> {
    let view = state
        .sessions
        .attach_proof(&id, payload.file_name, payload.note)
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/{id}/submit - 提交凭证，写入报名记录
pub async fn submit_proof(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.sessions.submit_proof(&id).await?))
}

/// POST /api/sessions/{id}/restart - 预留确认页上的 "完成支付"
pub async fn restart(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.sessions.restart_payment(&id).await?))
}

/// DELETE /api/sessions/{id} - 丢弃会话
pub async fn discard(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.sessions.discard(&id)?;
    Ok(Json(true))
}
