// ==========================================
// 车队运营跟踪系统 - 数据清洗器
// ==========================================
// 职责: NULL 标准化 / 标记匹配 / 数值解析
// 红线: 纯函数，不做业务判定（接受 / 拒绝由校验器决定）
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    /// 空白串 → None，其余 TRIM
    pub fn normalize_null(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 状态标记匹配（忽略大小写与首尾空白）
    pub fn matches_marker(&self, value: &str, marker: &str) -> bool {
        value.trim().eq_ignore_ascii_case(marker)
    }

    /// 解析源序号（非负整数）
    ///
    /// 接受 "7" / "7.0"（表格数值单元格）；拒绝负数、小数、带后缀文本
    pub fn parse_count(&self, value: &str) -> Option<u64> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Ok(n) = trimmed.parse::<u64>() {
            return Some(n);
        }

        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                Some(f as u64)
            }
            _ => None,
        }
    }

    /// 解析扣分；空 / 不可解析 → 0，小数截断
    pub fn parse_points(&self, value: &str) -> i64 {
        let trimmed = value.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return n;
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => f.trunc() as i64,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null("  "), None);
        assert_eq!(cleaner.normalize_null(""), None);
        assert_eq!(cleaner.normalize_null("  value  "), Some("value".to_string()));
    }

    #[test]
    fn test_matches_marker() {
        let cleaner = DataCleaner;
        assert!(cleaner.matches_marker("shipped", "SHIPPED"));
        assert!(cleaner.matches_marker(" Delivered ", "DELIVERED"));
        assert!(!cleaner.matches_marker("SHIPPED_PARTIAL", "SHIPPED"));
        assert!(!cleaner.matches_marker("", "SHIPPED"));
    }

    #[test]
    fn test_parse_count() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_count("7"), Some(7));
        assert_eq!(cleaner.parse_count(" 0 "), Some(0));
        assert_eq!(cleaner.parse_count("7.0"), Some(7));
        assert_eq!(cleaner.parse_count("7.5"), None);
        assert_eq!(cleaner.parse_count("-1"), None);
        assert_eq!(cleaner.parse_count("abc"), None);
        assert_eq!(cleaner.parse_count("7abc"), None);
        assert_eq!(cleaner.parse_count(""), None);
        assert_eq!(cleaner.parse_count("NaN"), None);
    }

    #[test]
    fn test_parse_points() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_points(""), 0);
        assert_eq!(cleaner.parse_points("abc"), 0);
        assert_eq!(cleaner.parse_points("5"), 5);
        assert_eq!(cleaner.parse_points("-3"), -3);
        assert_eq!(cleaner.parse_points("2.9"), 2);
    }
}
