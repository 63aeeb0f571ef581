//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`courses`] - 课程管理接口
//! - [`enrollments`] - 报名记录接口
//! - [`assignments`] - 营销分配接口
//! - [`marketers`] - 营销人员接口 (列表、佣金、推广链接)
//! - [`sessions`] - 报名会话接口 (状态机驱动)

pub mod assignments;
pub mod courses;
pub mod enrollments;
pub mod health;
pub mod marketers;
pub mod sessions;

use crate::core::ServerState;
use axum::Router;

// Re-export common types for handlers
pub use crate::utils::{AppResult, ApiResponse};

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(courses::router())
        .merge(enrollments::router())
        .merge(assignments::router())
        .merge(marketers::router())
        .merge(sessions::router())
}
