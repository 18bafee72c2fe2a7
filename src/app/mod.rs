// ==========================================
// 车队运营跟踪系统 - 应用层
// ==========================================
// 职责: 装配共享资源，供 CLI / 上层服务使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
