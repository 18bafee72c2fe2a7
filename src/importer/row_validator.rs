// ==========================================
// 车队运营跟踪系统 - 行校验器
// ==========================================
// 职责: 逐行判定接受 / 拒绝，接受时返回去重键
// 规则: 短路求值，只报告第一条失败规则
// 前提: 单元格已 TRIM（空白单元格视为空）
// ==========================================

use crate::domain::import::{DriverBehaviorRow, RejectReason, TripRow};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::dedup_index::DedupIndex;

const SHIPPED: &str = "SHIPPED";
const DELIVERED: &str = "DELIVERED";
const UNKNOWN_EVENT: &str = "UNKNOWN";

// ==========================================
// TripRowValidator
// ==========================================
pub struct TripRowValidator {
    cleaner: DataCleaner,
}

impl TripRowValidator {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 校验行程行
    ///
    /// # 规则（按顺序）
    /// 1. 装载单号非空且未知
    /// 2. 发运状态 = SHIPPED（忽略大小写）
    /// 3. 送达状态 = DELIVERED（忽略大小写）
    /// 4. 发运日期 / 送达日期均非空
    /// 5. 车队编号 / 司机 / 客户 / 线路均非空
    pub fn validate(
        &self,
        row: &TripRow,
        known: &DedupIndex<String>,
    ) -> Result<String, RejectReason> {
        let load_reference = self
            .cleaner
            .normalize_null(&row.load_reference)
            .ok_or(RejectReason::MissingLoadReference)?;

        if known.contains(&load_reference) {
            return Err(RejectReason::DuplicateLoadReference { load_reference });
        }

        if !self.cleaner.matches_marker(&row.shipped_status, SHIPPED) {
            return Err(RejectReason::NotShipped {
                status: row.shipped_status.clone(),
            });
        }

        if !self.cleaner.matches_marker(&row.delivered_status, DELIVERED) {
            return Err(RejectReason::NotDelivered {
                status: row.delivered_status.clone(),
            });
        }

        if row.shipped_date.trim().is_empty() || row.delivered_date.trim().is_empty() {
            return Err(RejectReason::MissingTripDates);
        }

        let missing: Vec<String> = [
            ("fleetNumber", &row.fleet_number),
            ("driverName", &row.driver_name),
            ("clientName", &row.client_name),
            ("route", &row.route),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

        if !missing.is_empty() {
            return Err(RejectReason::MissingTripFields { fields: missing });
        }

        Ok(load_reference)
    }
}

impl Default for TripRowValidator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// DriverBehaviorRowValidator
// ==========================================
pub struct DriverBehaviorRowValidator {
    cleaner: DataCleaner,
}

impl DriverBehaviorRowValidator {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 校验驾驶行为行
    ///
    /// # 规则（按顺序）
    /// 1. 事件类型非空且不是 UNKNOWN（忽略大小写）
    /// 2. count 为非负整数且未知
    pub fn validate(
        &self,
        row: &DriverBehaviorRow,
        known: &DedupIndex<u64>,
    ) -> Result<u64, RejectReason> {
        if row.event_type.trim().is_empty() {
            return Err(RejectReason::MissingEventType);
        }
        if self.cleaner.matches_marker(&row.event_type, UNKNOWN_EVENT) {
            return Err(RejectReason::UnknownEventType);
        }

        let count = self
            .cleaner
            .parse_count(&row.count)
            .ok_or_else(|| RejectReason::InvalidCount {
                raw: row.count.clone(),
            })?;

        if known.contains(&count) {
            return Err(RejectReason::DuplicateCount { count });
        }

        Ok(count)
    }
}

impl Default for DriverBehaviorRowValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::import::RawRow;

    fn trip(cells: [&str; 11]) -> TripRow {
        TripRow::from_raw(&RawRow::from_texts(cells))
    }

    fn good_trip(load_reference: &str) -> TripRow {
        trip([
            "4H", "A", "internal", "B", load_reference, "X-Y", "SHIPPED", "2024-01-01", "",
            "DELIVERED", "2024-01-03",
        ])
    }

    fn event(event_type: &str, count: &str) -> DriverBehaviorRow {
        let mut cells = vec![""; 12];
        cells[5] = event_type;
        cells[11] = count;
        DriverBehaviorRow::from_raw(&RawRow::from_texts(cells))
    }

    #[test]
    fn test_trip_accepts_complete_row() {
        let v = TripRowValidator::new();
        assert_eq!(v.validate(&good_trip("L1"), &DedupIndex::new()), Ok("L1".to_string()));
    }

    #[test]
    fn test_trip_marker_case_insensitive() {
        let v = TripRowValidator::new();
        let mut row = good_trip("L1");
        row.shipped_status = "shipped".to_string();
        row.delivered_status = "Delivered".to_string();
        assert!(v.validate(&row, &DedupIndex::new()).is_ok());
    }

    #[test]
    fn test_trip_rules_short_circuit_in_order() {
        let v = TripRowValidator::new();
        let mut known = DedupIndex::new();
        known.insert("L1".to_string());

        // 重复键优先于状态检查
        let mut row = good_trip("L1");
        row.shipped_status = String::new();
        assert_eq!(
            v.validate(&row, &known),
            Err(RejectReason::DuplicateLoadReference {
                load_reference: "L1".to_string()
            })
        );

        let mut row = good_trip("L2");
        row.shipped_status = "PENDING".to_string();
        assert_eq!(
            v.validate(&row, &known),
            Err(RejectReason::NotShipped {
                status: "PENDING".to_string()
            })
        );

        let mut row = good_trip("L2");
        row.delivered_status = String::new();
        assert!(matches!(
            v.validate(&row, &known),
            Err(RejectReason::NotDelivered { .. })
        ));
    }

    #[test]
    fn test_trip_missing_reference_or_dates() {
        let v = TripRowValidator::new();
        assert_eq!(
            v.validate(&good_trip("   "), &DedupIndex::new()),
            Err(RejectReason::MissingLoadReference)
        );

        let mut row = good_trip("L1");
        row.delivered_date = String::new();
        assert_eq!(
            v.validate(&row, &DedupIndex::new()),
            Err(RejectReason::MissingTripDates)
        );
    }

    #[test]
    fn test_trip_missing_fields_listed() {
        let v = TripRowValidator::new();
        let mut row = good_trip("L1");
        row.driver_name = String::new();
        row.route = String::new();
        assert_eq!(
            v.validate(&row, &DedupIndex::new()),
            Err(RejectReason::MissingTripFields {
                fields: vec!["driverName".to_string(), "route".to_string()]
            })
        );
    }

    #[test]
    fn test_event_type_rules() {
        let v = DriverBehaviorRowValidator::new();
        let known = DedupIndex::new();
        assert_eq!(v.validate(&event("", "1"), &known), Err(RejectReason::MissingEventType));
        assert_eq!(
            v.validate(&event("unknown", "1"), &known),
            Err(RejectReason::UnknownEventType)
        );
        assert_eq!(
            v.validate(&event("UnKnOwN", "1"), &known),
            Err(RejectReason::UnknownEventType)
        );
        assert_eq!(v.validate(&event("speeding", "1"), &known), Ok(1));
    }

    #[test]
    fn test_event_count_rules() {
        let v = DriverBehaviorRowValidator::new();
        let mut known = DedupIndex::new();
        known.insert(7u64);

        assert_eq!(
            v.validate(&event("speeding", "abc"), &known),
            Err(RejectReason::InvalidCount {
                raw: "abc".to_string()
            })
        );
        assert_eq!(
            v.validate(&event("speeding", "7"), &known),
            Err(RejectReason::DuplicateCount { count: 7 })
        );
        assert_eq!(v.validate(&event("speeding", "8"), &known), Ok(8));
    }
}
