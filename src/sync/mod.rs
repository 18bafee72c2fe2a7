// ==========================================
// 车队运营跟踪系统 - 快照同步
// ==========================================
// 职责: 存储推送的集合快照在进程内的只读视图
// ==========================================

pub mod entity_cache;

pub use entity_cache::EntityCache;
