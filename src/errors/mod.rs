// Application error types built on thiserror, plus the result aliases the crate uses.
use thiserror::Error;

// Make the response module public
pub mod response;
pub mod store;

// Re-export commonly used types
pub use store::{StoreError, StoreResult};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    // Persistence failures while saving a document.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // Template files that cannot be read.
    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
