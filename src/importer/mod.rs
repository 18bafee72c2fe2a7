// ==========================================
// 车队运营跟踪系统 - 导入层
// ==========================================
// 职责: 外部表格数据 → 行程 / 驾驶行为事件
// 支持: Webhook(JSON 数组), Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod dedup_index;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_orchestrator;
pub mod pipeline;
pub mod row_validator;
pub mod source;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use dedup_index::DedupIndex;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{DriverBehaviorFieldMapper, MappingContext, TripFieldMapper};
pub use file_parser::{open_file_source, CsvRowSource, ExcelRowSource};
pub use import_orchestrator::ImportOrchestrator;
pub use pipeline::{DriverBehaviorPipeline, ImportPipeline, TripPipeline};
pub use row_validator::{DriverBehaviorRowValidator, TripRowValidator};
pub use source::{parse_payload, RowSource, StaticRowSource, WebhookSource, DEFAULT_SHEET};

/// 行程导入编排器
pub type TripImporter = ImportOrchestrator<TripPipeline>;

/// 驾驶行为导入编排器
pub type DriverBehaviorImporter = ImportOrchestrator<DriverBehaviorPipeline>;
