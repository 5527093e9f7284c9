//! Repository Module
//!
//! CRUD operations over the SQLite pool. Repositories are free functions
//! taking `&SqlitePool`; multi-row operations open their own transaction so
//! a failure anywhere rolls the whole unit of work back.

pub mod inventory;
pub mod order;
pub mod product;
pub mod store;
pub mod user;

use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::Conflict("Record is referenced by other records".into());
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::InsufficientStock(msg) => AppError::InsufficientStock(msg),
            RepoError::InvalidTransition(msg) => AppError::InvalidTransition(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
