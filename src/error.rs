use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
