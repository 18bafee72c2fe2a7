// ==========================================
// 车队运营跟踪系统 - 去重索引
// ==========================================
// 生命周期: 每次导入调用从最新快照重建，调用结束即丢弃
// 语义: 批内第 N 行接受的键，会拒绝第 N+k 行的同键
// ==========================================

use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct DedupIndex<K: Eq + Hash> {
    keys: HashSet<K>,
}

impl<K: Eq + Hash> DedupIndex<K> {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// 由已知实体的键构造；None（无键实体）跳过
    pub fn from_known<I>(known: I) -> Self
    where
        I: IntoIterator<Item = Option<K>>,
    {
        Self {
            keys: known.into_iter().flatten().collect(),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// 返回 false 表示键已存在
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Eq + Hash> Default for DedupIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}
