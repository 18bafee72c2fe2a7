// ==========================================
// 车队运营跟踪系统 - 导入核心库
// ==========================================
// 技术栈: Rust + SQLite + reqwest
// 系统定位: 表格数据源 → 行程 / 驾驶行为事件 的对账式导入
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 实体存储
pub mod repository;

// 快照同步 - 只读缓存
pub mod sync;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 资源装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ClientType, Currency, EventStatus, ImportKind, PaymentStatus, Severity, TripStatus,
};

// 领域实体
pub use domain::{DriverBehaviorEvent, ImportReport, ImportSummary, RejectReason, Trip};

// 导入
pub use importer::{
    DriverBehaviorImporter, ImportError, ImportOrchestrator, ImportResult, RowSource,
    TripImporter, WebhookSource,
};

// 存储
pub use repository::{EntityStore, RepositoryError, SqliteDocumentStore};

// API
pub use api::{ApiError, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车队运营跟踪系统";
