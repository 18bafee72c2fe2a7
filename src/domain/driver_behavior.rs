// ==========================================
// 车队运营跟踪系统 - 驾驶行为事件领域模型
// ==========================================
// 用途: 导入层写入，事件处理流程后续确认/结案
// 去重键: count（源表格分配的序号，不同于存储 ID）
// ==========================================

use crate::domain::entity::StoredEntity;
use crate::domain::types::{EventStatus, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DriverBehaviorEvent - 驾驶行为事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverBehaviorEvent {
    pub id: String,

    // ===== 事件信息 =====
    pub event_type: String, // 源表格原文（如 "harsh_braking"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub driver_name: String,
    pub fleet_number: String,
    pub event_date: String,
    pub event_time: String,
    pub location: String,

    // ===== 上报 =====
    pub reported_at: String,
    pub reported_by: String,

    // ===== 处理 =====
    pub severity: Severity,
    pub status: EventStatus,
    pub points: i64,
    #[serde(default)]
    pub action_taken: String,

    // ===== 源序号 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    pub imported_at: DateTime<Utc>,
}

// ==========================================
// DriverBehaviorEventDraft - 待提交的事件载荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverBehaviorEventDraft {
    pub event_type: String,
    pub description: Option<String>,
    pub driver_name: String,
    pub fleet_number: String,
    pub event_date: String,
    pub event_time: String,
    pub location: String,
    pub reported_at: String,
    pub reported_by: String,
    pub severity: Severity,
    pub status: EventStatus,
    pub points: i64,
    pub action_taken: String,
    pub count: Option<u64>,
    pub imported_at: DateTime<Utc>,
}

impl StoredEntity for DriverBehaviorEvent {
    type Draft = DriverBehaviorEventDraft;

    const COLLECTION: &'static str = "driver_behavior_events";

    fn id(&self) -> &str {
        &self.id
    }

    fn dedup_key(&self) -> Option<String> {
        self.count.map(|c| c.to_string())
    }

    fn from_draft(id: String, draft: DriverBehaviorEventDraft) -> Self {
        DriverBehaviorEvent {
            id,
            event_type: draft.event_type,
            description: draft.description,
            driver_name: draft.driver_name,
            fleet_number: draft.fleet_number,
            event_date: draft.event_date,
            event_time: draft.event_time,
            location: draft.location,
            reported_at: draft.reported_at,
            reported_by: draft.reported_by,
            severity: draft.severity,
            status: draft.status,
            points: draft.points,
            action_taken: draft.action_taken,
            count: draft.count,
            imported_at: draft.imported_at,
        }
    }
}
