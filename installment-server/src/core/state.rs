use sqlx::SqlitePool;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::uploads::ImageStore;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Clone 实现浅拷贝 (SqlitePool 内部为 Arc)，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | images | ImageStore | 客户照片存储 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 客户照片存储
    pub images: ImageStore,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let images = ImageStore::new(config.uploads_dir(), config.max_upload_bytes);
        Self {
            config,
            pool,
            images,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (database/, uploads/customers/)
    /// 2. 数据库 (连接池 + 迁移)
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        tracing::info!(
            work_dir = %config.work_dir,
            database = %db_path.display(),
            "Server state initialized"
        );

        Ok(Self::new(config.clone(), db_service.pool))
    }
}
