use thiserror::Error;

use crate::domain::models::CategoryId;

/// Errors that can occur during grid and category operations.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid day: {0}")]
    InvalidDay(String),
    #[error("invalid category name: {0}")]
    InvalidCategoryName(String),
    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),
    #[error("storage error: {0}")]
    Storage(String),
}

impl GridError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<sqlx::Error> for GridError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
