//! Service tools
//!
//! One function per exposed operation, grouped by area. Each takes the
//! database handle and validated-on-entry parameters, and returns a
//! serializable response or a [`ToolError`].

pub mod dashboard;
pub mod foods;
pub mod import;
pub mod logs;
pub mod profile;

use thiserror::Error;

use crate::db::DbError;

/// Operation-level error
#[derive(Debug, Error)]
pub enum ToolError {
    /// Caller passed something invalid (bad quantity, empty name, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced entity does not exist or belongs to someone else
    #[error("not found: {0}")]
    NotFound(String),

    /// Underlying database failure
    #[error("database error: {0}")]
    Db(#[from] DbError),
}

pub type ToolResult<T> = Result<T, ToolError>;
