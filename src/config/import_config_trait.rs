// ==========================================
// 车队运营跟踪系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::Currency;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 数据源 =====

    /// 行程数据源 webhook 地址；未配置返回 None
    async fn get_trips_webhook_url(&self) -> ImportResult<Option<String>>;

    /// 驾驶行为数据源 webhook 地址；未配置返回 None
    async fn get_driver_behavior_webhook_url(&self) -> ImportResult<Option<String>>;

    /// 请求的工作表名
    ///
    /// # 默认值
    /// - "Data"
    async fn get_sheet_name(&self) -> ImportResult<String>;

    /// 拉取超时（毫秒），0 表示不设超时
    ///
    /// # 默认值
    /// - 0
    async fn get_fetch_timeout_ms(&self) -> ImportResult<u64>;

    // ===== 字段映射默认值 =====

    /// 导入行程的收入币种
    ///
    /// # 默认值
    /// - ZAR
    async fn get_default_currency(&self) -> ImportResult<Currency>;

    /// 导入驾驶行为事件的上报人
    ///
    /// # 默认值
    /// - "Webhook Import"
    async fn get_reported_by(&self) -> ImportResult<String>;
}
