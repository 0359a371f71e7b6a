use thiserror::Error;

/// Server-level errors (startup, shutdown, infrastructure)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("数据库错误: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 服务器的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
