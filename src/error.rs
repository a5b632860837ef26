//! Error types shared across the crate

use std::path::PathBuf;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failures reading or writing the backing document
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access data file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data file '{}': {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode collection: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Malformed {
            path: path.into(),
            source,
        }
    }
}

/// Request-level failures, rendered as `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Unauthorized: Invalid API key")]
    Unauthorized,
    #[error("Item not found")]
    NotFound,
    #[error("Request body is empty")]
    EmptyBody,
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EmptyBody | ApiError::NotAnObject | ApiError::InvalidJson(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key is not configured (set API_KEY, --api-key or server.api_key)")]
    MissingApiKey,
    #[error("failed to read config file '{}': {reason}", .path.display())]
    File { path: PathBuf, reason: String },
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::EmptyBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotAnObject.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidJson("eof".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_messages() {
        assert_eq!(
            ApiError::Unauthorized.to_string(),
            "Unauthorized: Invalid API key"
        );
        assert_eq!(ApiError::NotFound.to_string(), "Item not found");
        assert_eq!(ApiError::EmptyBody.to_string(), "Request body is empty");
    }

    #[test]
    fn test_store_error_mentions_path() {
        let err = StoreError::io(
            "data/data.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("data/data.json"));
        assert!(msg.contains("denied"));
    }
}
