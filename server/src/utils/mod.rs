//! Utility module - shared helpers and types
//!
//! - [`AppError`] - application error type
//! - [`AppResponse`] - API response envelope
//! - logging and validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, ok};
pub use result::AppResult;
