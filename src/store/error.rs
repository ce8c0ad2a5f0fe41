use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store call timed out after {0}s")]
    Timeout(u64),

    #[error("Store task failed: {0}")]
    Task(String),

    #[error("Store lock poisoned")]
    Poisoned,
}
