// ==========================================
// 车队运营跟踪系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享资源（连接 / 配置 / 存储 / API实例）
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ApiResult, ImportApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::repository::{DriverBehaviorStore, TripStore};

/// 应用状态
///
/// 配置 / 两个实体集合共享同一数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 行程集合
    pub trip_store: Arc<TripStore>,

    /// 驾驶行为事件集合
    pub driver_behavior_store: Arc<DriverBehaviorStore>,

    /// 导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    pub async fn new(db_path: impl Into<String>) -> ApiResult<Self> {
        let db_path = db_path.into();
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)?;
        init_schema(&conn)?;
        match read_schema_version(&conn)? {
            Some(v) if v == CURRENT_SCHEMA_VERSION => {}
            other => tracing::warn!(
                found = ?other,
                expected = CURRENT_SCHEMA_VERSION,
                "schema_version 与当前代码不一致"
            ),
        }
        let conn = Arc::new(Mutex::new(conn));

        let config = Arc::new(ConfigManager::from_connection(conn.clone())?);
        let trip_store = Arc::new(TripStore::new(conn.clone())?);
        let driver_behavior_store = Arc::new(DriverBehaviorStore::new(conn)?);

        let import_api = Arc::new(
            ImportApi::new(
                config.clone(),
                trip_store.clone(),
                driver_behavior_store.clone(),
            )
            .await?,
        );

        tracing::info!("AppState初始化成功");

        Ok(Self {
            db_path,
            config,
            trip_store,
            driver_behavior_store,
            import_api,
        })
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("FLEET_OPS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 回退值：当前工作目录
    let mut path = PathBuf::from("./fleet_ops.db");

    if let Some(data_dir) = dirs::data_local_dir() {
        let dir = data_dir.join("fleet-ops");
        // 目录创建失败时保留回退值
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("fleet_ops.db");
        }
    }

    path.to_string_lossy().to_string()
}
