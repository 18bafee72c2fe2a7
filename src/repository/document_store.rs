// ==========================================
// 车队运营跟踪系统 - SQLite 文档存储
// ==========================================
// 职责: 以 JSON 文档形式持久化实体，写入后推送集合快照
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{ensure_collection, open_sqlite_connection};
use crate::domain::driver_behavior::DriverBehaviorEvent;
use crate::domain::entity::StoredEntity;
use crate::domain::trip::Trip;
use crate::repository::entity_store::{EntityStore, Snapshot};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

/// 行程集合
pub type TripStore = SqliteDocumentStore<Trip>;

/// 驾驶行为事件集合
pub type DriverBehaviorStore = SqliteDocumentStore<DriverBehaviorEvent>;

// ==========================================
// SqliteDocumentStore
// ==========================================
pub struct SqliteDocumentStore<E: StoredEntity> {
    conn: Arc<Mutex<Connection>>,
    feed: watch::Sender<Snapshot<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: StoredEntity> SqliteDocumentStore<E> {
    /// 基于已有连接创建（多个集合可共享同一连接）
    ///
    /// 集合表不存在时自动创建；初始快照为当前全部文档
    pub fn new(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let initial = {
            let guard = Self::lock_conn(&conn)?;
            ensure_collection(&guard, E::COLLECTION)?;
            Self::load_all(&guard)?
        };

        let (feed, _) = watch::channel(Arc::new(initial));

        Ok(Self {
            conn,
            feed,
            _entity: PhantomData,
        })
    }

    /// 打开独立连接
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::new(Arc::new(Mutex::new(conn)))
    }

    fn lock_conn(conn: &Arc<Mutex<Connection>>) -> RepositoryResult<MutexGuard<'_, Connection>> {
        conn.lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // 无法解析的文档（其他流程写入 / 字段缺失）跳过并告警，不阻断整个集合
    fn load_all(conn: &Connection) -> RepositoryResult<Vec<E>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, doc FROM {} ORDER BY rowid",
            E::COLLECTION
        ))?;

        let docs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entities = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            match serde_json::from_str::<E>(&doc) {
                Ok(entity) => entities.push(entity),
                Err(e) => warn!(
                    collection = E::COLLECTION,
                    id = %id,
                    error = %e,
                    "跳过无法解析的文档"
                ),
            }
        }
        Ok(entities)
    }

    // 写入提交后就地更新快照（持锁推送，快照顺序与写入顺序一致）
    fn publish(&self, apply: impl FnOnce(&mut Vec<E>)) {
        self.feed.send_modify(|snapshot| {
            apply(Arc::make_mut(snapshot));
            debug!(collection = E::COLLECTION, len = snapshot.len(), "推送集合快照");
        });
    }

    fn not_found(id: &str) -> RepositoryError {
        RepositoryError::NotFound {
            collection: E::COLLECTION.to_string(),
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl<E: StoredEntity> EntityStore<E> for SqliteDocumentStore<E> {
    async fn add(&self, draft: E::Draft) -> RepositoryResult<String> {
        let id = Uuid::new_v4().to_string();
        let entity = E::from_draft(id.clone(), draft);
        let doc = serde_json::to_string(&entity)?;
        let now = Utc::now().to_rfc3339();

        let conn = Self::lock_conn(&self.conn)?;
        conn.execute(
            &format!(
                "INSERT INTO {} (id, dedup_key, doc, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
                E::COLLECTION
            ),
            params![id, entity.dedup_key(), doc, now],
        )?;
        self.publish(|entities| entities.push(entity));

        Ok(id)
    }

    async fn update(&self, entity: E) -> RepositoryResult<()> {
        let doc = serde_json::to_string(&entity)?;
        let now = Utc::now().to_rfc3339();

        let conn = Self::lock_conn(&self.conn)?;
        let affected = conn.execute(
            &format!(
                "UPDATE {} SET dedup_key = ?2, doc = ?3, updated_at = ?4 WHERE id = ?1",
                E::COLLECTION
            ),
            params![entity.id(), entity.dedup_key(), doc, now],
        )?;
        if affected == 0 {
            return Err(Self::not_found(entity.id()));
        }
        let id = entity.id().to_string();
        self.publish(|entities| match entities.iter().position(|e| e.id() == id) {
            Some(idx) => entities[idx] = entity,
            None => entities.push(entity),
        });
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = Self::lock_conn(&self.conn)?;
        let affected = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", E::COLLECTION),
            params![id],
        )?;
        if affected == 0 {
            return Err(Self::not_found(id));
        }
        self.publish(|entities| entities.retain(|e| e.id() != id));
        Ok(())
    }

    async fn get(&self, id: &str) -> RepositoryResult<Option<E>> {
        let conn = Self::lock_conn(&self.conn)?;
        let doc: Option<String> = conn
            .query_row(
                &format!("SELECT doc FROM {} WHERE id = ?1", E::COLLECTION),
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> RepositoryResult<Vec<E>> {
        let conn = Self::lock_conn(&self.conn)?;
        Self::load_all(&conn)
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot<E>> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip::TripDraft;
    use crate::domain::types::{ClientType, Currency};

    fn store() -> TripStore {
        let conn = Connection::open_in_memory().unwrap();
        TripStore::new(Arc::new(Mutex::new(conn))).unwrap()
    }

    fn draft(load_reference: &str) -> TripDraft {
        TripDraft {
            fleet_number: "4H".to_string(),
            driver_name: "A".to_string(),
            client_name: "B".to_string(),
            client_type: ClientType::Internal,
            route: "X-Y".to_string(),
            load_reference: Some(load_reference.to_string()),
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

    #[tokio::test]
    async fn test_add_assigns_id_and_publishes() {
        let store = store();
        let rx = store.subscribe();
        assert!(rx.borrow().is_empty());

        let id = store.add(draft("L1")).await.unwrap();
        assert!(!id.is_empty());

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert_eq!(snapshot[0].load_reference.as_deref(), Some("L1"));
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = store();
        for r in ["L3", "L1", "L2"] {
            store.add(draft(r)).await.unwrap();
        }

        let refs: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|t| t.load_reference)
            .collect();
        assert_eq!(refs, vec!["L3", "L1", "L2"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = store();
        let id = store.add(draft("L1")).await.unwrap();

        let mut trip = store.get(&id).await.unwrap().unwrap();
        trip.route = "Y-Z".to_string();
        store.update(trip).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap().unwrap().route, "Y-Z");

        store.delete(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(store.subscribe().borrow().is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let store = store();
        let err = store.delete("nope").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_new_store_loads_existing_documents() {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let first = TripStore::new(conn.clone()).unwrap();
        first.add(draft("L1")).await.unwrap();

        let second = TripStore::new(conn).unwrap();
        assert_eq!(second.subscribe().borrow().len(), 1);
    }

    fn seed_unreadable(conn: &Arc<Mutex<Connection>>) {
        let guard = conn.lock().unwrap();
        ensure_collection(&guard, "trips").unwrap();
        guard
            .execute(
                "INSERT INTO trips (id, dedup_key, doc, created_at, updated_at) VALUES ('x', NULL, '{}', '', '')",
                [],
            )
            .unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_document_does_not_block_writes() {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        seed_unreadable(&conn);

        let store = TripStore::new(conn).unwrap();
        assert!(store.subscribe().borrow().is_empty());

        let id = store.add(draft("L1")).await.unwrap();

        let snapshot = store.subscribe().borrow().clone();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_tracks_writes_without_reload() {
        let store = store();
        let rx = store.subscribe();
        let a = store.add(draft("L1")).await.unwrap();
        let held = rx.borrow().clone();
        let b = store.add(draft("L2")).await.unwrap();

        // 已取出的快照不受后续写入影响
        assert_eq!(held.len(), 1);

        let mut trip = store.get(&b).await.unwrap().unwrap();
        trip.route = "Y-Z".to_string();
        store.update(trip).await.unwrap();
        store.delete(&a).await.unwrap();

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, b);
        assert_eq!(snapshot[0].route, "Y-Z");
    }
}
