//! Error responses for the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use songbook_core::SongError;

use super::validation::ValidationError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// An error a handler returns to the caller.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<SongError> for ApiError {
    fn from(e: SongError) -> Self {
        match e {
            SongError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "not_found", e.to_string()),
            SongError::AlreadyExists(_) => {
                Self::new(StatusCode::CONFLICT, "already_exists", e.to_string())
            }
            SongError::PageOutOfRange(_) => {
                Self::new(StatusCode::NOT_FOUND, "page_not_found", e.to_string())
            }
            SongError::EmptyUpdate => {
                Self::new(StatusCode::BAD_REQUEST, "empty_update", e.to_string())
            }
            SongError::Database(ref detail) => {
                tracing::error!("Storage error: {}", detail);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.error.to_string(),
                message: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songbook_core::PageOutOfRange;

    #[test]
    fn test_song_error_status_mapping() {
        let cases = [
            (SongError::NotFound(1), StatusCode::NOT_FOUND),
            (
                SongError::AlreadyExists("group: A, song: B".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                SongError::PageOutOfRange(PageOutOfRange {
                    page: 3,
                    total_pages: 2,
                }),
                StatusCode::NOT_FOUND,
            ),
            (SongError::EmptyUpdate, StatusCode::BAD_REQUEST),
            (
                SongError::Database("disk I/O error".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_storage_error_detail_not_exposed() {
        let error = ApiError::from(SongError::Database("no such table: songs".to_string()));
        assert!(!error.message.contains("songs"));
    }
}
