// ==========================================
// 车队运营跟踪系统 - 实体缓存
// ==========================================
// 职责: 订阅实体存储的快照推送，向导入层提供“当前已知实体”
// 说明: 快照可能滞后于刚完成的写入；导入层的批内去重不依赖它
// ==========================================

use crate::domain::entity::StoredEntity;
use crate::repository::entity_store::{EntityStore, Snapshot};
use tokio::sync::watch;

pub struct EntityCache<E: StoredEntity> {
    feed: watch::Receiver<Snapshot<E>>,
}

impl<E: StoredEntity> EntityCache<E> {
    pub fn attach(store: &dyn EntityStore<E>) -> Self {
        Self {
            feed: store.subscribe(),
        }
    }

    /// 当前快照（廉价克隆 Arc）
    pub fn snapshot(&self) -> Snapshot<E> {
        self.feed.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.feed.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.borrow().is_empty()
    }

    /// 等待下一次推送；存储已释放时返回 false
    pub async fn changed(&mut self) -> bool {
        self.feed.changed().await.is_ok()
    }
}

impl<E: StoredEntity> Clone for EntityCache<E> {
    fn clone(&self) -> Self {
        Self {
            feed: self.feed.clone(),
        }
    }
}
