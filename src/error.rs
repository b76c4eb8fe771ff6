use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to acquire store lock")]
    Lock,
}

#[derive(Debug, Error)]
pub enum SearchEngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, SearchEngineError>;
