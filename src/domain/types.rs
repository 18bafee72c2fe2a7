// ==========================================
// 车队运营跟踪系统 - 领域类型定义
// ==========================================
// 职责: 枚举值与其外部文本形式（导入源/文档存储共用）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 客户类型 (Client Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Internal, // 内部客户
    External, // 外部客户
}

impl ClientType {
    /// 源表格只区分 "internal"，其余一律视为外部客户
    pub fn from_cell(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("internal") {
            ClientType::Internal
        } else {
            ClientType::External
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientType::Internal => write!(f, "internal"),
            ClientType::External => write!(f, "external"),
        }
    }
}

// ==========================================
// 币种 (Currency)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    #[default]
    Zar,
}

impl Currency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "ZAR" => Some(Currency::Zar),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Zar => write!(f, "ZAR"),
        }
    }
}

// ==========================================
// 行程状态 (Trip Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Active,
    Flagged,
    Completed,
    Invoiced,
    Paid,
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripStatus::Active => write!(f, "active"),
            TripStatus::Flagged => write!(f, "flagged"),
            TripStatus::Completed => write!(f, "completed"),
            TripStatus::Invoiced => write!(f, "invoiced"),
            TripStatus::Paid => write!(f, "paid"),
        }
    }
}

// ==========================================
// 收款状态 (Payment Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::Partial => write!(f, "partial"),
            PaymentStatus::Paid => write!(f, "paid"),
        }
    }
}

// ==========================================
// 驾驶行为严重度 (Severity)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 驾驶行为事件处理状态 (Event Status)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Acknowledged,
    Resolved,
    Disputed,
}

impl EventStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(EventStatus::Pending),
            "acknowledged" => Some(EventStatus::Acknowledged),
            "resolved" => Some(EventStatus::Resolved),
            "disputed" => Some(EventStatus::Disputed),
            _ => None,
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Pending => write!(f, "pending"),
            EventStatus::Acknowledged => write!(f, "acknowledged"),
            EventStatus::Resolved => write!(f, "resolved"),
            EventStatus::Disputed => write!(f, "disputed"),
        }
    }
}

// ==========================================
// 导入类型 (Import Kind)
// ==========================================
// 两条导入管道各自独立的列契约与键空间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportKind {
    Trips,
    DriverBehavior,
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportKind::Trips => write!(f, "TRIPS"),
            ImportKind::DriverBehavior => write!(f, "DRIVER_BEHAVIOR"),
        }
    }
}
