// ==========================================
// 车队运营跟踪系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供实体存储接口,屏蔽数据库细节
// 约束: 所有值查询使用参数化；集合名只来自编译期常量
// ==========================================

pub mod document_store;
pub mod entity_store;
pub mod error;

// 重导出核心仓储
pub use document_store::{DriverBehaviorStore, SqliteDocumentStore, TripStore};
pub use entity_store::{EntityStore, Snapshot};
pub use error::{RepositoryError, RepositoryResult};
