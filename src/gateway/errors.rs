//! # Gateway Errors
//!
//! Error taxonomy for the REST gateway.
//!
//! Every failure is raised at the point of detection and rendered exactly
//! once at the HTTP boundary, via the [`IntoResponse`] impl below.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Collection is not in the configured allow-list
    #[error("collection not exposed: {0}")]
    UnknownCollection(String),

    /// Path identifier is not a valid object id
    #[error("invalid object id: {0}")]
    InvalidIdentifier(String),

    /// Request body or query parameter is not valid extended JSON
    #[error("malformed extended JSON: {0}")]
    MalformedBody(String),

    /// limit/skip not parseable as a non-negative integer
    #[error("invalid query parameter {name}: {value}")]
    InvalidParameter { name: String, value: String },

    /// No document with the requested identifier
    #[error("no document with id {0}")]
    NotFound(String),

    /// The store refused an insert
    #[error("insert rejected: {diagnostic}")]
    InsertRejected {
        /// The document the client tried to insert, echoed back
        document: serde_json::Value,
        diagnostic: String,
    },

    /// The store refused an update
    #[error("update rejected: {diagnostic}")]
    UpdateRejected {
        /// The update specification the client supplied, echoed back
        document: serde_json::Value,
        diagnostic: String,
    },

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Unclassified store fault (unreachable server, broken connection, ...)
    #[error("store error: {0}")]
    Store(String),
}

impl GatewayError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            GatewayError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            GatewayError::InsertRejected { .. } => StatusCode::BAD_REQUEST,
            GatewayError::UpdateRejected { .. } => StatusCode::BAD_REQUEST,

            GatewayError::UnknownCollection(_) => StatusCode::NOT_FOUND,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,

            GatewayError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable name of the error kind, carried in the `exception` body field
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::UnknownCollection(_) => "UnknownCollection",
            GatewayError::InvalidIdentifier(_) => "InvalidIdentifier",
            GatewayError::MalformedBody(_) => "MalformedBody",
            GatewayError::InvalidParameter { .. } => "InvalidParameter",
            GatewayError::NotFound(_) => "NotFound",
            GatewayError::InsertRejected { .. } => "InsertRejected",
            GatewayError::UpdateRejected { .. } => "UpdateRejected",
            GatewayError::Store(_) => "StoreError",
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        // Write rejections are re-classified at the call site, where the
        // offending payload is still in hand; everything else is a server
        // fault.
        match err {
            StoreError::Rejected(msg) => GatewayError::Store(msg),
            StoreError::Unavailable(msg) => GatewayError::Store(msg),
            StoreError::Initialization(msg) => GatewayError::Store(msg),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub exception: String,
    /// Echo of the offending input, present for rejected writes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<serde_json::Value>,
    /// Diagnostic from the underlying store, present for rejected writes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl From<GatewayError> for ErrorBody {
    fn from(err: GatewayError) -> Self {
        let message = err.to_string();
        let exception = err.kind().to_string();
        let (document, diagnostic) = match err {
            GatewayError::InsertRejected { document, diagnostic }
            | GatewayError::UpdateRejected { document, diagnostic } => {
                (Some(document), Some(diagnostic))
            }
            _ => (None, None),
        };
        Self { message, exception, document, diagnostic }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        (status, Json(ErrorBody::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GatewayError::UnknownCollection("users".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::InvalidIdentifier("xyz".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::NotFound("0".repeat(24)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::Store("connection reset".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejected_write_echoes_payload() {
        let err = GatewayError::InsertRejected {
            document: serde_json::json!({"name": "x"}),
            diagnostic: "duplicate key".to_string(),
        };
        let body = ErrorBody::from(err);
        assert_eq!(body.exception, "InsertRejected");
        assert_eq!(body.document, Some(serde_json::json!({"name": "x"})));
        assert_eq!(body.diagnostic.as_deref(), Some("duplicate key"));
    }

    #[test]
    fn test_plain_errors_have_no_payload() {
        let body = ErrorBody::from(GatewayError::MalformedBody("not json".to_string()));
        assert_eq!(body.exception, "MalformedBody");
        assert!(body.document.is_none());
        assert!(body.diagnostic.is_none());
    }
}
