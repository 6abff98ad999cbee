// ==========================================
// 仓储作业管理系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("表头为空: {0}")]
    EmptyHeader(String),

    // ===== 数据规模错误 =====
    #[error("数据行数超限: 共 {count} 行，上限 {max} 行")]
    TooManyRows { count: usize, max: usize },

    // ===== 数据库错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::DatabaseQueryError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<RepositoryError>
impl From<crate::repository::error::RepositoryError> for ImportError {
    fn from(err: crate::repository::error::RepositoryError) -> Self {
        use crate::repository::error::RepositoryError;
        match err {
            RepositoryError::DatabaseConnectionError(msg) => {
                ImportError::DatabaseConnectionError(msg)
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ImportError::DatabaseTransactionError(msg)
            }
            other => ImportError::DatabaseQueryError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
