// ==========================================
// 车队运营跟踪系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把导入层 / 仓储层错误转换为调用方可读的消息
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 导入错误（批次级）
    // ==========================================
    #[error("数据源不可用: {0}")]
    SourceUnavailable(String),

    #[error("导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { collection, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", collection, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::DuplicateId(msg) => {
                ApiError::DatabaseError(format!("文档 ID 冲突: {}", msg))
            }
            RepositoryError::InvalidCollection(name) => {
                ApiError::InternalError(format!("集合名不合法: {}", name))
            }
            RepositoryError::SerializationError(msg) => {
                ApiError::DatabaseError(format!("文档损坏: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            e @ (ImportError::Transport(_)
            | ImportError::HttpStatus { .. }
            | ImportError::MalformedPayload(_)) => ApiError::SourceUnavailable(e.to_string()),

            e @ (ImportError::FileNotFound(_) | ImportError::UnsupportedFormat(_)) => {
                ApiError::InvalidInput(e.to_string())
            }

            e @ (ImportError::FileReadError(_)
            | ImportError::ExcelParseError(_)
            | ImportError::CsvParseError(_)) => ApiError::ImportError(e.to_string()),

            e @ (ImportError::ConfigReadError { .. }
            | ImportError::ConfigValueError { .. }
            | ImportError::MissingConfig(_)) => ApiError::ConfigError(e.to_string()),

            ImportError::Store(err) => ApiError::from(err),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::from(RepositoryError::from(err))
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
