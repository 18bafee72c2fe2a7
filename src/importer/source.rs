// ==========================================
// 车队运营跟踪系统 - 行数据源
// ==========================================
// 职责: 拉取一批原始行（webhook / 文件 / 内存）
// 红线: 数据源只负责取数；任何失败都是批次级，不做部分返回
// ==========================================

use crate::domain::import::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// 默认工作表名
pub const DEFAULT_SHEET: &str = "Data";

// ==========================================
// RowSource Trait
// ==========================================
// 实现者: WebhookSource / CsvRowSource / ExcelRowSource / StaticRowSource
#[async_trait]
pub trait RowSource: Send + Sync {
    /// 数据源标识（日志 / 报告 / 审计）
    fn source_id(&self) -> String;

    /// 拉取全部行（按源顺序）
    async fn fetch_rows(&self) -> ImportResult<Vec<RawRow>>;
}

/// 解析 webhook 响应体
///
/// 顶层必须是数组；元素不是数组时按空行处理（后续校验拒绝并计数）
pub fn parse_payload(body: &str) -> ImportResult<Vec<RawRow>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ImportError::MalformedPayload(format!("响应不是合法 JSON: {}", e)))?;
    rows_from_value(value)
}

/// 顶层 JSON 值 → 原始行
pub fn rows_from_value(value: Value) -> ImportResult<Vec<RawRow>> {
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::Array(cells) => RawRow::new(cells),
                other => {
                    debug!(element = %other, "非数组元素按空行处理");
                    RawRow::default()
                }
            })
            .collect()),
        Value::Null => Err(ImportError::MalformedPayload("响应为空".to_string())),
        other => Err(ImportError::MalformedPayload(format!(
            "响应顶层不是数组: {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ==========================================
// WebhookSource - HTTP GET <url>?sheet=<sheet>
// ==========================================
pub struct WebhookSource {
    url: String,
    sheet: String,
    client: reqwest::Client,
}

impl WebhookSource {
    /// 创建数据源
    ///
    /// # 参数
    /// - url: webhook 地址
    /// - sheet: 工作表名
    /// - timeout: 请求超时；None 表示沿用传输层默认（不超时）
    pub fn new(
        url: impl Into<String>,
        sheet: impl Into<String>,
        timeout: Option<Duration>,
    ) -> ImportResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ImportError::Transport(format!("HTTP 客户端构建失败: {}", e)))?;

        Ok(Self {
            url: url.into(),
            sheet: sheet.into(),
            client,
        })
    }

    /// 按毫秒配置构造；0 表示不设超时
    pub fn with_timeout_ms(
        url: impl Into<String>,
        sheet: impl Into<String>,
        timeout_ms: u64,
    ) -> ImportResult<Self> {
        let timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        Self::new(url, sheet, timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }
}

#[async_trait]
impl RowSource for WebhookSource {
    fn source_id(&self) -> String {
        format!("{}?sheet={}", self.url, self.sheet)
    }

    async fn fetch_rows(&self) -> ImportResult<Vec<RawRow>> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("sheet", self.sheet.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.text().await?;
        let rows = parse_payload(&body)?;
        debug!(url = %self.url, rows = rows.len(), "webhook 拉取完成");
        Ok(rows)
    }
}

// ==========================================
// StaticRowSource - 内存数据源（已取得的响应 / 测试数据）
// ==========================================
#[derive(Debug, Clone)]
pub struct StaticRowSource {
    source_id: String,
    rows: Vec<RawRow>,
}

impl StaticRowSource {
    pub fn from_rows(source_id: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            source_id: source_id.into(),
            rows,
        }
    }

    /// 由完整响应值构造；顶层不是数组时返回 MalformedPayload
    pub fn from_value(source_id: impl Into<String>, value: Value) -> ImportResult<Self> {
        Ok(Self::from_rows(source_id, rows_from_value(value)?))
    }
}

#[async_trait]
impl RowSource for StaticRowSource {
    fn source_id(&self) -> String {
        self.source_id.clone()
    }

    async fn fetch_rows(&self) -> ImportResult<Vec<RawRow>> {
        Ok(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_payload_array_of_arrays() {
        let rows = parse_payload(r#"[["4H","A"],[],["x",1,null]]"#).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text(0), "4H");
        assert!(rows[1].is_empty());
        assert_eq!(rows[2].text(1), "1");
    }

    #[test]
    fn test_non_array_element_becomes_empty_row() {
        let rows = rows_from_value(json!([["a"], {"k": "v"}, "text"])).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_empty());
        assert!(rows[2].is_empty());
    }

    #[test]
    fn test_malformed_payloads() {
        for body in ["", "not json", "null", r#"{"rows": []}"#, "42"] {
            let err = parse_payload(body).unwrap_err();
            assert!(
                matches!(err, ImportError::MalformedPayload(_)),
                "body={:?} err={:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_webhook_source_id_includes_sheet() {
        let source = WebhookSource::with_timeout_ms("http://127.0.0.1:9/exec", "Data", 0).unwrap();
        assert_eq!(source.source_id(), "http://127.0.0.1:9/exec?sheet=Data");
        assert_eq!(source.sheet(), "Data");
    }
}
