//! Utility Module
//!
//! Error types, result aliases, logging setup and small helpers.

pub mod error;
pub mod logger;
pub mod result;
pub mod slug;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
