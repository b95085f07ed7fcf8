// Defines the application error type and result alias using the thiserror crate.
use thiserror::Error;

// Make the response module public
pub mod response;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("{0}")]
    Validation(String),

    // Missing ids and ids owned by another user collapse into this one
    // variant so a response never discloses that a foreign task exists.
    #[error("Task not found or access denied")]
    TaskNotFound,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Email already registered")]
    DuplicateEmail,

    // The #[from] attribute automatically converts the source error using the From trait.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
