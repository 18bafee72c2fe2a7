// ==========================================
// 车队运营跟踪系统 - 持久化实体约定
// ==========================================
// 职责: 文档集合中实体的公共接口（存储 ID / 去重键 / 草稿转换）
// 红线: 草稿 (Draft) 不含存储 ID，ID 只由实体存储在 add 时分配
// ==========================================

use serde::de::DeserializeOwned;
use serde::Serialize;

/// 可存入文档集合的顶层聚合
pub trait StoredEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 尚未分配存储 ID 的实体载荷
    type Draft: Send + Sync + 'static;

    /// 集合（表）名
    const COLLECTION: &'static str;

    /// 存储 ID
    fn id(&self) -> &str;

    /// 去重键的文本形式；没有键的实体（如手工录入）返回 None
    fn dedup_key(&self) -> Option<String>;

    /// 用存储分配的 ID 实体化草稿
    fn from_draft(id: String, draft: Self::Draft) -> Self;
}
