use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate prefix: {0}")]
    DuplicatePrefix(String),

    #[error("Duplicate host: {0}")]
    DuplicateHost(String),

    #[error("Directory backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
