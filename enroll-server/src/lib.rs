//! Enrollment Edge Server - 课程市场报名与推广结算服务
//!
//! # 架构概述
//!
//! 本模块是报名服务的主入口，提供以下核心功能：
//!
//! - **报名会话** (`enrollment`): 显式状态机驱动的座位预留、支付凭证流程
//! - **推广结算** (`referral`): 跟踪链接归因与佣金计算
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx, WAL)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! enroll-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (连接池、仓储)
//! ├── enrollment/    # 报名会话状态机
//! ├── referral/      # 推广归因与佣金
//! └── utils/         # 工具函数 (日志、验证)
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod enrollment;
pub mod referral;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{build_router, Config, Server, ServerState};
pub use db::DbService;
pub use enrollment::{SessionManager, SessionState};
pub use referral::ReferralToken;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ______                 ____
   / ____/___  _________  / / /
  / __/ / __ \/ ___/ __ \/ / /
 / /___/ / / / /  / /_/ / / /
/_____/_/ /_/_/   \____/_/_/
    ______    __
   / ____/___/ /___ ____
  / __/ / __  / __ `/ _ \
 / /___/ /_/ / /_/ /  __/
/_____/\__,_/\__, /\___/
            /____/
    "#
    );
}

/// 设置运行环境：加载 .env、创建工作目录、初始化日志
///
/// 返回日志 appender 的 guard，需在进程生命周期内持有。
pub fn setup_environment()
-> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = std::path::PathBuf::from(config.log_dir());
    let guard = utils::logger::init_logger_with_file(
        "info",
        config.is_production(),
        Some(log_dir.as_path()),
    )?;
    Ok(guard)
}
