use sqlx::SqlitePool;
use std::sync::Arc;

use crate::core::Config;
use crate::db::DbService;
use crate::enrollment::SessionManager;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的共享引用
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | sessions | Arc<SessionManager> | 活跃报名会话 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 活跃报名会话管理器
    pub sessions: Arc<SessionManager>,
}

impl ServerState {
    /// 初始化服务器状态：打开数据库、跑迁移、建立会话管理器
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.db_path()).await?;
        let sessions = Arc::new(SessionManager::new(db.pool.clone(), config.currency_factor));
        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            sessions,
        })
    }

    /// 基于已有连接池构造 (测试场景)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let sessions = Arc::new(SessionManager::new(pool.clone(), config.currency_factor));
        Self {
            config,
            pool,
            sessions,
        }
    }
}
