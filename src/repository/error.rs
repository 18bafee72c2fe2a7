// ==========================================
// 车队运营跟踪系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use rusqlite::ErrorCode;
use thiserror::Error;

/// 实体存储错误
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 文档 =====
    #[error("文档不存在: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("文档 ID 冲突: {0}")]
    DuplicateId(String),

    #[error("集合名不合法: {0}")]
    InvalidCollection(String),

    #[error("文档编解码失败: {0}")]
    SerializationError(String),

    // ===== 连接 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("SQLite 执行失败: {0}")]
    DatabaseQueryError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
                RepositoryError::DuplicateId(msg.clone().unwrap_or_else(|| err.to_string()))
            }
            rusqlite::Error::InvalidParameterName(name) => {
                RepositoryError::InvalidCollection(name.clone())
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
