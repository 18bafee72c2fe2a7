// ==========================================
// 车队运营跟踪系统 - 实体存储 Trait
// ==========================================
// 职责: 文档集合的增删改查 + 变更订阅（不包含业务逻辑）
// 红线: 存储 ID 由 add 分配；去重键由导入层负责，存储层不做唯一约束
// ==========================================

use crate::domain::entity::StoredEntity;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// 集合的完整快照（按写入顺序）
pub type Snapshot<E> = Arc<Vec<E>>;

// ==========================================
// EntityStore Trait
// ==========================================
// 实现者: SqliteDocumentStore（rusqlite + JSON 文档）
#[async_trait]
pub trait EntityStore<E: StoredEntity>: Send + Sync {
    /// 写入新实体
    ///
    /// # 返回
    /// - Ok(String): 存储分配的 ID
    /// - Err: 写入失败（实体未落库）
    async fn add(&self, draft: E::Draft) -> RepositoryResult<String>;

    /// 整体替换已有实体
    ///
    /// # 返回
    /// - Err(NotFound): ID 不存在
    async fn update(&self, entity: E) -> RepositoryResult<()>;

    /// 删除实体
    ///
    /// # 返回
    /// - Err(NotFound): ID 不存在
    async fn delete(&self, id: &str) -> RepositoryResult<()>;

    async fn get(&self, id: &str) -> RepositoryResult<Option<E>>;

    async fn list(&self) -> RepositoryResult<Vec<E>>;

    /// 订阅集合快照；每次成功写入后推送新快照
    fn subscribe(&self) -> watch::Receiver<Snapshot<E>>;
}
