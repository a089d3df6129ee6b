use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaxbanError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("task {0} not found")]
    TaskNotFound(String),

    #[error("unauthorized: missing or incorrect board token")]
    Unauthorized,

    #[error("invalid import payload: {0}")]
    InvalidFormat(String),

    #[error("backing store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("locked by another process: {0}")]
    Locked(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl MaxbanError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::TaskNotFound(_) => "task_not_found",
            Self::Unauthorized => "unauthorized",
            Self::InvalidFormat(_) => "invalid_format",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Locked(_) => "locked",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::Db(_) => "db_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, MaxbanError>;
