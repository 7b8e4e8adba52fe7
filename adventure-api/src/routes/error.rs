use std::fmt;

use adventure_core::MonthParseError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{auth::BackendError, domain::GridError, repositories::RepositoryError};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<GridError> for ApiError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::InvalidDay(_) | GridError::InvalidCategoryName(_) => {
                Self::bad_request(err.to_string())
            }
            GridError::UnknownCategory(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            GridError::Storage(message) => {
                tracing::error!("Grid storage operation failed: {}", message);
                Self::internal("storage operation failed")
            }
        }
    }
}

impl From<MonthParseError> for ApiError {
    fn from(err: MonthParseError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            RepositoryError::AlreadyExists(_) => Self::conflict("email is already registered"),
            RepositoryError::DatabaseError(e) => {
                tracing::error!("Database error: {}", e);
                Self::internal("database error")
            }
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Repository(e) => e.into(),
            BackendError::InvalidSignup(message) => Self::bad_request(message),
            BackendError::TaskJoin(_) | BackendError::Hash(_) => {
                tracing::error!("Auth backend failed: {}", err);
                Self::internal("authentication failed")
            }
        }
    }
}
