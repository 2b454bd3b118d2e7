//! Installment Server - 分期销售台账服务
//!
//! # 架构概述
//!
//! - **账本** (`ledger`): 已付金额/剩余余额/状态推导，定价策略
//! - **销售业务** (`sales`): 事务性创建、还款增删改、业务员分配
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移与各表的 SQL
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! installment-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── auth.rs        # 调用者身份提取
//! ├── db/            # 数据库层
//! ├── ledger/        # 账本计算 (纯函数)
//! ├── sales/         # 销售业务服务
//! ├── uploads.rs     # 客户照片存储
//! └── utils/         # 日志、校验、错误
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod ledger;
pub mod sales;
pub mod uploads;
pub mod utils;

// Re-export 公共类型
pub use auth::CallerIdentity;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env，初始化日志
pub fn setup_environment() -> Result<Config, Box<dyn std::error::Error>> {
    // .env 文件可选
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e.into());
    }

    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    );
    Ok(config)
}
