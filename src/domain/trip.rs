// ==========================================
// 车队运营跟踪系统 - 行程领域模型
// ==========================================
// 用途: 导入层写入，行程管理流程后续修改
// 去重键: load_reference（唯一权威标识，description 不参与去重）
// ==========================================

use crate::domain::entity::StoredEntity;
use crate::domain::types::{ClientType, Currency, PaymentStatus, TripStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Trip - 行程
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    // ===== 主键 =====
    pub id: String, // 存储 ID（由实体存储分配）

    // ===== 基础信息 =====
    pub fleet_number: String,
    pub driver_name: String,
    pub client_name: String,
    pub client_type: ClientType,
    pub route: String,

    // ===== 业务标识 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_reference: Option<String>, // 装载单号（导入去重键）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // ===== 时间 =====
    pub start_date: String, // 发运日期（源表格原文）
    pub end_date: String,   // 送达日期（源表格原文）

    // ===== 财务 =====
    pub base_revenue: f64,
    pub revenue_currency: Currency,
    pub distance_km: f64,

    // ===== 状态 =====
    pub status: TripStatus,
    pub payment_status: PaymentStatus,

    // ===== 子集合（导入时为空）=====
    #[serde(default)]
    pub additional_costs: Vec<AdditionalCost>,
    #[serde(default)]
    pub delay_reasons: Vec<DelayReason>,
    #[serde(default)]
    pub follow_up_history: Vec<serde_json::Value>,

    // ===== 审计字段 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_source: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// TripDraft - 待提交的行程载荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDraft {
    pub fleet_number: String,
    pub driver_name: String,
    pub client_name: String,
    pub client_type: ClientType,
    pub route: String,
    pub load_reference: Option<String>,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub base_revenue: f64,
    pub revenue_currency: Currency,
    pub distance_km: f64,
    pub import_source: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// AdditionalCost - 附加费用
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCost {
    pub id: String,
    pub trip_id: String,
    pub cost_type: String,
    pub amount: f64,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_at: String,
    pub added_by: String,
}

// ==========================================
// DelayReason - 延误原因
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayReason {
    pub id: String,
    pub trip_id: String,
    pub delay_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub delay_duration: f64, // 小时
    pub reported_at: String,
    pub reported_by: String,
}

impl StoredEntity for Trip {
    type Draft = TripDraft;

    const COLLECTION: &'static str = "trips";

    fn id(&self) -> &str {
        &self.id
    }

    fn dedup_key(&self) -> Option<String> {
        self.load_reference
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// 新行程统一进入 active / unpaid，子集合为空
    fn from_draft(id: String, draft: TripDraft) -> Self {
        Trip {
            id,
            fleet_number: draft.fleet_number,
            driver_name: draft.driver_name,
            client_name: draft.client_name,
            client_type: draft.client_type,
            route: draft.route,
            load_reference: draft.load_reference,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            base_revenue: draft.base_revenue,
            revenue_currency: draft.revenue_currency,
            distance_km: draft.distance_km,
            status: TripStatus::Active,
            payment_status: PaymentStatus::Unpaid,
            additional_costs: Vec::new(),
            delay_reasons: Vec::new(),
            follow_up_history: Vec::new(),
            import_source: draft.import_source,
            created_at: draft.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(load_reference: Option<&str>) -> TripDraft {
        TripDraft {
            fleet_number: "4H".to_string(),
            driver_name: "A".to_string(),
            client_name: "B".to_string(),
            client_type: ClientType::External,
            route: "X-Y".to_string(),
            load_reference: load_reference.map(str::to_string),
            description: None,
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-03".to_string(),
            base_revenue: 0.0,
            revenue_currency: Currency::Zar,
            distance_km: 0.0,
            import_source: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_draft_defaults() {
        let trip = Trip::from_draft("T-1".to_string(), draft(Some("L1")));

        assert_eq!(trip.id(), "T-1");
        assert_eq!(trip.status, TripStatus::Active);
        assert_eq!(trip.payment_status, PaymentStatus::Unpaid);
        assert!(trip.additional_costs.is_empty());
        assert!(trip.delay_reasons.is_empty());
        assert!(trip.follow_up_history.is_empty());
    }

    #[test]
    fn test_dedup_key_ignores_blank_reference() {
        assert_eq!(
            Trip::from_draft("T-1".to_string(), draft(Some("L1"))).dedup_key(),
            Some("L1".to_string())
        );
        assert_eq!(Trip::from_draft("T-2".to_string(), draft(Some("  "))).dedup_key(), None);
        assert_eq!(Trip::from_draft("T-3".to_string(), draft(None)).dedup_key(), None);
    }

    #[test]
    fn test_document_uses_camel_case() {
        let trip = Trip::from_draft("T-1".to_string(), draft(Some("L1")));
        let doc = serde_json::to_value(&trip).unwrap();

        assert_eq!(doc["loadReference"], "L1");
        assert_eq!(doc["revenueCurrency"], "ZAR");
        assert_eq!(doc["clientType"], "external");
    }
}
