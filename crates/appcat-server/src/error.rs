//! Server errors and their HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use appcat_store::{CatalogError, ErrorKind};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub code: &'static str,
    pub message: String,
}

impl ServerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::AlreadyExists | ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Catalog(e) => match e.kind() {
                ErrorKind::Validation => "VALIDATION_ERROR",
                ErrorKind::NotFound => "NOT_FOUND",
                ErrorKind::AlreadyExists => "ALREADY_EXISTS",
                ErrorKind::Conflict => "CONFLICT",
                ErrorKind::Internal => "INTERNAL",
            },
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorBody {
            code: self.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_kinds_map_to_statuses() {
        let cases = [
            (CatalogError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (CatalogError::category_not_found("VPN"), StatusCode::NOT_FOUND),
            (
                CatalogError::AlreadyExists { category: "VPN".into() },
                StatusCode::CONFLICT,
            ),
            (
                CatalogError::Conflict {
                    category: "VPN".into(),
                    name: "a".into(),
                    publisher: "p".into(),
                },
                StatusCode::CONFLICT,
            ),
            (CatalogError::LockPoisoned, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_details_are_hidden() {
        let response = ServerError::Internal("secret path".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn codes() {
        assert_eq!(ServerError::bad_request("x").code(), "BAD_REQUEST");
        assert_eq!(
            ServerError::from(CatalogError::category_not_found("VPN")).code(),
            "NOT_FOUND"
        );
    }
}
