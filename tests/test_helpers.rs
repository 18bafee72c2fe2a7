// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、实体存储、测试行构造、HTTP 桩服务
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use fleet_ops_import::db::{init_schema, open_sqlite_connection};
use fleet_ops_import::domain::{RawRow, StoredEntity};
use fleet_ops_import::repository::{
    DriverBehaviorStore, EntityStore, RepositoryError, RepositoryResult, Snapshot, TripStore,
};
use rusqlite::Connection;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::watch;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 共享连接的两个集合
pub fn open_stores(
    db_path: &str,
) -> Result<(Arc<TripStore>, Arc<DriverBehaviorStore>), Box<dyn Error>> {
    let conn: Arc<Mutex<Connection>> = Arc::new(Mutex::new(open_sqlite_connection(db_path)?));
    let trips = Arc::new(TripStore::new(conn.clone())?);
    let events = Arc::new(DriverBehaviorStore::new(conn)?);
    Ok((trips, events))
}

// ==========================================
// 测试行构造
// ==========================================

/// 完整可导入的行程行（列契约 V1）
pub fn trip_row(load_reference: &str) -> RawRow {
    trip_row_with(load_reference, "SHIPPED", "2024-01-01", "DELIVERED", "2024-01-03")
}

pub fn trip_row_with(
    load_reference: &str,
    shipped_status: &str,
    shipped_date: &str,
    delivered_status: &str,
    delivered_date: &str,
) -> RawRow {
    RawRow::from_texts([
        "4H",
        "Sipho",
        "internal",
        "Acme Logistics",
        load_reference,
        "JHB-DBN",
        shipped_status,
        shipped_date,
        "",
        delivered_status,
        delivered_date,
    ])
}

/// 驾驶行为行（列契约 V1）；points 为空串表示未填
pub fn event_row(event_type: &str, count: &str, points: &str) -> RawRow {
    RawRow::from_texts([
        "",
        "",
        "Sipho",
        "2024-01-01",
        "08:15",
        event_type,
        "4H",
        "N3 Van Reenen",
        "",
        "",
        points,
        count,
    ])
}

// ==========================================
// FlakyStore - 指定第 N 次 add 失败的包装存储
// ==========================================
pub struct FlakyStore<E: StoredEntity> {
    inner: Arc<dyn EntityStore<E>>,
    fail_on: Vec<usize>, // 从 1 开始的 add 调用序号
    calls: AtomicUsize,
}

impl<E: StoredEntity> FlakyStore<E> {
    pub fn new(inner: Arc<dyn EntityStore<E>>, fail_on: Vec<usize>) -> Self {
        Self {
            inner,
            fail_on,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn add_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E: StoredEntity> EntityStore<E> for FlakyStore<E> {
    async fn add(&self, draft: E::Draft) -> RepositoryResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&call) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "injected failure on add #{}",
                call
            )));
        }
        self.inner.add(draft).await
    }

    async fn update(&self, entity: E) -> RepositoryResult<()> {
        self.inner.update(entity).await
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.inner.delete(id).await
    }

    async fn get(&self, id: &str) -> RepositoryResult<Option<E>> {
        self.inner.get(id).await
    }

    async fn list(&self) -> RepositoryResult<Vec<E>> {
        self.inner.list().await
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot<E>> {
        self.inner.subscribe()
    }
}

// ==========================================
// HTTP 桩服务（固定状态码 + 响应体）
// ==========================================
pub struct HttpStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl HttpStub {
    /// 收到的请求行（如 "GET /exec?sheet=Data HTTP/1.1"）
    pub fn request_lines(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// 启动本地 HTTP 桩，每个连接都返回同一响应
pub async fn spawn_http_stub(status: u16, body: impl Into<String>) -> HttpStub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = Arc::new(body.into());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let body = body.clone();
            let recorded = recorded.clone();

            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            buf.extend_from_slice(&chunk[..n]);
                            if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                let request = String::from_utf8_lossy(&buf);
                if let Some(line) = request.lines().next() {
                    recorded.lock().unwrap().push(line.to_string());
                }

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason_phrase(status),
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    HttpStub {
        base_url: format!("http://{}", addr),
        requests,
    }
}
