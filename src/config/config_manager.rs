// ==========================================
// 车队运营跟踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::Currency;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> ImportResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self.lock()?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// 从 config_kv 表读取配置值，带默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> ImportResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式，按键排序）
    pub fn get_config_snapshot(&self) -> ImportResult<String> {
        let conn = self.lock()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&config_map).map_err(|e| ImportError::InternalError(e.to_string()))
    }

    // 空白串视为未配置
    fn get_optional_text(&self, key: &str) -> ImportResult<Option<String>> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    // ===== 数据源 =====

    async fn get_trips_webhook_url(&self) -> ImportResult<Option<String>> {
        self.get_optional_text(config_keys::TRIPS_WEBHOOK_URL)
    }

    async fn get_driver_behavior_webhook_url(&self) -> ImportResult<Option<String>> {
        self.get_optional_text(config_keys::DRIVER_BEHAVIOR_WEBHOOK_URL)
    }

    async fn get_sheet_name(&self) -> ImportResult<String> {
        Ok(self
            .get_optional_text(config_keys::SHEET_NAME)?
            .unwrap_or_else(|| defaults::SHEET_NAME.to_string()))
    }

    async fn get_fetch_timeout_ms(&self) -> ImportResult<u64> {
        let value = self.get_config_or_default(config_keys::FETCH_TIMEOUT_MS, "0")?;
        value
            .trim()
            .parse::<u64>()
            .map_err(|e| ImportError::ConfigValueError {
                key: config_keys::FETCH_TIMEOUT_MS.to_string(),
                value,
                message: e.to_string(),
            })
    }

    // ===== 字段映射默认值 =====

    async fn get_default_currency(&self) -> ImportResult<Currency> {
        let value = self.get_config_or_default(config_keys::DEFAULT_CURRENCY, "ZAR")?;
        match Currency::parse(&value) {
            Some(currency) => Ok(currency),
            None => {
                warn!(key = config_keys::DEFAULT_CURRENCY, value = %value, "未知币种，回退为 ZAR");
                Ok(Currency::default())
            }
        }
    }

    async fn get_reported_by(&self) -> ImportResult<String> {
        Ok(self
            .get_optional_text(config_keys::REPORTED_BY)?
            .unwrap_or_else(|| defaults::REPORTED_BY.to_string()))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 数据源
    pub const TRIPS_WEBHOOK_URL: &str = "import.trips.webhook_url";
    pub const DRIVER_BEHAVIOR_WEBHOOK_URL: &str = "import.driver_behavior.webhook_url";
    pub const SHEET_NAME: &str = "import.sheet_name";
    pub const FETCH_TIMEOUT_MS: &str = "import.fetch_timeout_ms";

    // 字段映射
    pub const DEFAULT_CURRENCY: &str = "import.default_currency";
    pub const REPORTED_BY: &str = "import.reported_by";
}

pub mod defaults {
    pub const SHEET_NAME: &str = "Data";
    pub const REPORTED_BY: &str = "Webhook Import";
}
