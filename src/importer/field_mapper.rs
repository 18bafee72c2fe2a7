// ==========================================
// 车队运营跟踪系统 - 字段映射器
// ==========================================
// 职责: 已校验行 → 实体草稿（补默认值）
// 红线: 不失败；不分配存储 ID
// ==========================================

use crate::domain::driver_behavior::DriverBehaviorEventDraft;
use crate::domain::import::{DriverBehaviorRow, TripRow};
use crate::domain::trip::TripDraft;
use crate::domain::types::{ClientType, Currency, EventStatus, Severity};
use crate::importer::data_cleaner::DataCleaner;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

/// 单次导入调用共享的映射上下文
#[derive(Debug, Clone)]
pub struct MappingContext {
    pub source_id: String,
    pub imported_at: DateTime<Utc>,
}

impl MappingContext {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            imported_at: Utc::now(),
        }
    }

    fn imported_at_text(&self) -> String {
        self.imported_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

// ==========================================
// TripFieldMapper
// ==========================================
pub struct TripFieldMapper {
    default_currency: Currency,
}

impl TripFieldMapper {
    pub fn new(default_currency: Currency) -> Self {
        Self { default_currency }
    }

    /// 收入 / 里程不在源表格中，导入时为 0
    pub fn map(&self, row: &TripRow, load_reference: &str, ctx: &MappingContext) -> TripDraft {
        TripDraft {
            fleet_number: row.fleet_number.clone(),
            driver_name: row.driver_name.clone(),
            client_name: row.client_name.clone(),
            client_type: ClientType::from_cell(&row.client_type),
            route: row.route.clone(),
            load_reference: Some(load_reference.to_string()),
            description: None,
            start_date: row.shipped_date.clone(),
            end_date: row.delivered_date.clone(),
            base_revenue: 0.0,
            revenue_currency: self.default_currency,
            distance_km: 0.0,
            import_source: Some(ctx.source_id.clone()),
            created_at: ctx.imported_at,
        }
    }
}

impl Default for TripFieldMapper {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

// ==========================================
// DriverBehaviorFieldMapper
// ==========================================
pub struct DriverBehaviorFieldMapper {
    reported_by: String,
    cleaner: DataCleaner,
}

impl DriverBehaviorFieldMapper {
    pub fn new(reported_by: impl Into<String>) -> Self {
        Self {
            reported_by: reported_by.into(),
            cleaner: DataCleaner,
        }
    }

    pub fn map(
        &self,
        row: &DriverBehaviorRow,
        count: u64,
        ctx: &MappingContext,
    ) -> DriverBehaviorEventDraft {
        let severity = Severity::parse(&row.severity).unwrap_or_else(|| {
            if !row.severity.is_empty() {
                debug!(raw = %row.severity, count, "未识别的严重度，使用默认值");
            }
            Severity::default()
        });

        let status = EventStatus::parse(&row.status).unwrap_or_else(|| {
            if !row.status.is_empty() {
                debug!(raw = %row.status, count, "未识别的处理状态，使用默认值");
            }
            EventStatus::default()
        });

        let reported_at = self
            .cleaner
            .normalize_null(&row.reported_at)
            .unwrap_or_else(|| ctx.imported_at_text());

        DriverBehaviorEventDraft {
            event_type: row.event_type.clone(),
            description: Some(row.event_type.clone()),
            driver_name: row.driver_name.clone(),
            fleet_number: row.fleet_number.clone(),
            event_date: row.event_date.clone(),
            event_time: row.event_time.clone(),
            location: row.location.clone(),
            reported_at,
            reported_by: self.reported_by.clone(),
            severity,
            status,
            points: self.cleaner.parse_points(&row.points),
            action_taken: String::new(),
            count: Some(count),
            imported_at: ctx.imported_at,
        }
    }
}
