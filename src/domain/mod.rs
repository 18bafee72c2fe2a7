// ==========================================
// 车队运营跟踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入行契约
// 红线: 不含数据访问逻辑,不含导入编排逻辑
// ==========================================

pub mod driver_behavior;
pub mod entity;
pub mod import;
pub mod trip;
pub mod types;

// 重导出核心类型
pub use driver_behavior::{DriverBehaviorEvent, DriverBehaviorEventDraft};
pub use entity::StoredEntity;
pub use import::{
    ContractVersion, DriverBehaviorRow, ImportBatch, ImportReport, ImportSummary, RawRow,
    RejectReason, RowOutcome, RowReport, TripRow,
};
pub use trip::{AdditionalCost, DelayReason, Trip, TripDraft};
pub use types::{ClientType, Currency, EventStatus, ImportKind, PaymentStatus, Severity, TripStatus};
