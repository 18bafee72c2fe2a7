// ==========================================
// 车队运营跟踪系统 - 导入领域模型
// ==========================================
// 职责: 原始行 / 列契约 / 行级结果 / 批次汇总
// 红线: 源数据只有列位置语义，没有列名；列位置变更必须升级契约版本
// ==========================================

use crate::domain::types::ImportKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

// ==========================================
// RawRow - 原始行（按位置访问）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: Vec<Value>,
}

impl RawRow {
    pub fn new(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    /// 由文本单元格构造（CSV / 测试数据）
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(|s| Value::String(s.into())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, index: usize) -> Option<&Value> {
        self.cells.get(index)
    }

    /// 单元格文本（TRIM 后）；越界 / null 一律为空串
    pub fn text(&self, index: usize) -> String {
        match self.cells.get(index) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

// ==========================================
// ContractVersion - 列契约版本
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractVersion {
    V1,
}

// ==========================================
// TripRow - 行程行（列契约 V1）
// ==========================================
// 列 8 不参与映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripRow {
    pub fleet_number: String,
    pub driver_name: String,
    pub client_type: String,
    pub client_name: String,
    pub load_reference: String,
    pub route: String,
    pub shipped_status: String,
    pub shipped_date: String,
    pub delivered_status: String,
    pub delivered_date: String,
}

impl TripRow {
    pub const CONTRACT: ContractVersion = ContractVersion::V1;

    pub const FLEET_NUMBER: usize = 0;
    pub const DRIVER_NAME: usize = 1;
    pub const CLIENT_TYPE: usize = 2;
    pub const CLIENT_NAME: usize = 3;
    pub const LOAD_REFERENCE: usize = 4;
    pub const ROUTE: usize = 5;
    pub const SHIPPED_STATUS: usize = 6;
    pub const SHIPPED_DATE: usize = 7;
    pub const DELIVERED_STATUS: usize = 9;
    pub const DELIVERED_DATE: usize = 10;

    pub fn from_raw(row: &RawRow) -> Self {
        Self {
            fleet_number: row.text(Self::FLEET_NUMBER),
            driver_name: row.text(Self::DRIVER_NAME),
            client_type: row.text(Self::CLIENT_TYPE),
            client_name: row.text(Self::CLIENT_NAME),
            load_reference: row.text(Self::LOAD_REFERENCE),
            route: row.text(Self::ROUTE),
            shipped_status: row.text(Self::SHIPPED_STATUS),
            shipped_date: row.text(Self::SHIPPED_DATE),
            delivered_status: row.text(Self::DELIVERED_STATUS),
            delivered_date: row.text(Self::DELIVERED_DATE),
        }
    }
}

// ==========================================
// DriverBehaviorRow - 驾驶行为行（列契约 V1）
// ==========================================
// 列 1 不参与映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverBehaviorRow {
    pub reported_at: String,
    pub driver_name: String,
    pub event_date: String,
    pub event_time: String,
    pub event_type: String,
    pub fleet_number: String,
    pub location: String,
    pub severity: String,
    pub status: String,
    pub points: String,
    pub count: String,
}

impl DriverBehaviorRow {
    pub const CONTRACT: ContractVersion = ContractVersion::V1;

    pub const REPORTED_AT: usize = 0;
    pub const DRIVER_NAME: usize = 2;
    pub const EVENT_DATE: usize = 3;
    pub const EVENT_TIME: usize = 4;
    pub const EVENT_TYPE: usize = 5;
    pub const FLEET_NUMBER: usize = 6;
    pub const LOCATION: usize = 7;
    pub const SEVERITY: usize = 8;
    pub const STATUS: usize = 9;
    pub const POINTS: usize = 10;
    pub const COUNT: usize = 11;

    pub fn from_raw(row: &RawRow) -> Self {
        Self {
            reported_at: row.text(Self::REPORTED_AT),
            driver_name: row.text(Self::DRIVER_NAME),
            event_date: row.text(Self::EVENT_DATE),
            event_time: row.text(Self::EVENT_TIME),
            event_type: row.text(Self::EVENT_TYPE),
            fleet_number: row.text(Self::FLEET_NUMBER),
            location: row.text(Self::LOCATION),
            severity: row.text(Self::SEVERITY),
            status: row.text(Self::STATUS),
            points: row.text(Self::POINTS),
            count: row.text(Self::COUNT),
        }
    }
}

// ==========================================
// RejectReason - 行被拒原因
// ==========================================
// 校验规则短路：只记录第一条失败规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    // ===== 行程 =====
    MissingLoadReference,
    DuplicateLoadReference { load_reference: String },
    NotShipped { status: String },
    NotDelivered { status: String },
    MissingTripDates,
    MissingTripFields { fields: Vec<String> },

    // ===== 驾驶行为 =====
    MissingEventType,
    UnknownEventType,
    InvalidCount { raw: String },
    DuplicateCount { count: u64 },
}

impl RejectReason {
    /// 稳定的原因代码（日志 / 报表）
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::MissingLoadReference => "MISSING_LOAD_REFERENCE",
            RejectReason::DuplicateLoadReference { .. } => "DUPLICATE_LOAD_REFERENCE",
            RejectReason::NotShipped { .. } => "NOT_SHIPPED",
            RejectReason::NotDelivered { .. } => "NOT_DELIVERED",
            RejectReason::MissingTripDates => "MISSING_TRIP_DATES",
            RejectReason::MissingTripFields { .. } => "MISSING_TRIP_FIELDS",
            RejectReason::MissingEventType => "MISSING_EVENT_TYPE",
            RejectReason::UnknownEventType => "UNKNOWN_EVENT_TYPE",
            RejectReason::InvalidCount { .. } => "INVALID_COUNT",
            RejectReason::DuplicateCount { .. } => "DUPLICATE_COUNT",
        }
    }

    /// 本地化描述（按当前 locale）
    pub fn message(&self) -> String {
        use crate::i18n::{t, t_with_args};

        match self {
            RejectReason::MissingLoadReference => t("reject.missing_load_reference"),
            RejectReason::DuplicateLoadReference { load_reference } => t_with_args(
                "reject.duplicate_load_reference",
                &[("load_reference", load_reference.as_str())],
            ),
            RejectReason::NotShipped { status } => {
                t_with_args("reject.not_shipped", &[("status", status.as_str())])
            }
            RejectReason::NotDelivered { status } => {
                t_with_args("reject.not_delivered", &[("status", status.as_str())])
            }
            RejectReason::MissingTripDates => t("reject.missing_trip_dates"),
            RejectReason::MissingTripFields { fields } => t_with_args(
                "reject.missing_trip_fields",
                &[("fields", fields.join(",").as_str())],
            ),
            RejectReason::MissingEventType => t("reject.missing_event_type"),
            RejectReason::UnknownEventType => t("reject.unknown_event_type"),
            RejectReason::InvalidCount { raw } => {
                t_with_args("reject.invalid_count", &[("raw", raw.as_str())])
            }
            RejectReason::DuplicateCount { count } => {
                t_with_args("reject.duplicate_count", &[("count", count.to_string().as_str())])
            }
        }
    }
}

// ==========================================
// RowOutcome - 单行处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowOutcome {
    /// 已提交；key 为去重键，entity_id 为存储分配的 ID
    Accepted { key: String, entity_id: String },
    /// 未通过校验
    Rejected { reason: RejectReason },
    /// 校验通过但提交失败
    Failed { error: String },
}

impl RowOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RowOutcome::Accepted { .. })
    }
}

// ==========================================
// RowReport - 行号 + 结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowReport {
    pub row_number: usize, // 源数据中的行号（从 1 开始）
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

// ==========================================
// ImportSummary - 对外汇总契约
// ==========================================
// 不变式: imported + skipped == 批次行数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.imported + self.skipped
    }
}

// ==========================================
// ImportBatch - 导入批次（仅在一次调用内存活，不落库）
// ==========================================
#[derive(Debug)]
pub struct ImportBatch {
    pub kind: ImportKind,
    pub source_id: String,
    pub rows: Vec<RawRow>,
    imported: usize,
    skipped: usize,
}

impl ImportBatch {
    pub fn new(kind: ImportKind, source_id: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            kind,
            source_id: source_id.into(),
            rows,
            imported: 0,
            skipped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 计数：Accepted 记为 imported，其余记为 skipped
    pub fn record(&mut self, outcome: &RowOutcome) {
        if outcome.is_accepted() {
            self.imported += 1;
        } else {
            self.skipped += 1;
        }
    }

    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            imported: self.imported,
            skipped: self.skipped,
        }
    }
}

// ==========================================
// ImportReport - 导入结果（含逐行明细）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub kind: ImportKind,
    pub source_id: String,
    pub contract: ContractVersion,
    pub summary: ImportSummary,
    pub rows: Vec<RowReport>,
    pub elapsed: Duration,
}

impl ImportReport {
    /// 被拒行（行号 + 原因）
    pub fn rejections(&self) -> impl Iterator<Item = (usize, &RejectReason)> {
        self.rows.iter().filter_map(|r| match &r.outcome {
            RowOutcome::Rejected { reason } => Some((r.row_number, reason)),
            _ => None,
        })
    }

    /// 提交失败行（行号 + 错误）
    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.rows.iter().filter_map(|r| match &r.outcome {
            RowOutcome::Failed { error } => Some((r.row_number, error.as_str())),
            _ => None,
        })
    }
}
