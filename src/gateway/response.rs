//! # Response Formatting
//!
//! Extended-JSON response writer. All success bodies pass through here so
//! the compact/pretty choice applies uniformly.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use super::extjson;

/// An extended JSON response.
///
/// `compact` selects minimal separators; the alternative is pretty-printed
/// output. The distinction is purely cosmetic.
#[derive(Debug)]
pub struct ExtJson {
    status: StatusCode,
    value: serde_json::Value,
    compact: bool,
}

impl ExtJson {
    pub fn new(status: StatusCode, value: serde_json::Value, compact: bool) -> Self {
        Self { status, value, compact }
    }

    pub fn ok(value: serde_json::Value, compact: bool) -> Self {
        Self::new(StatusCode::OK, value, compact)
    }
}

impl IntoResponse for ExtJson {
    fn into_response(self) -> Response {
        match extjson::encode(&self.value, self.compact) {
            Ok(mut bytes) => {
                bytes.push(b'\n');
                (
                    self.status,
                    [(header::CONTENT_TYPE, "application/json")],
                    bytes,
                )
                    .into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    async fn body_of(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_compact_and_pretty_bodies_differ_only_in_layout() {
        let value = json!({"name": "x", "n": 1});

        let compact = ExtJson::ok(value.clone(), true).into_response();
        assert_eq!(
            compact.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let compact_bytes = body_of(compact).await;

        let pretty_bytes = body_of(ExtJson::ok(value.clone(), false).into_response()).await;

        assert_ne!(compact_bytes, pretty_bytes);
        let a: serde_json::Value = serde_json::from_slice(&compact_bytes).unwrap();
        let b: serde_json::Value = serde_json::from_slice(&pretty_bytes).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, value);
    }

    #[tokio::test]
    async fn test_status_is_preserved() {
        let response = ExtJson::new(StatusCode::CREATED, json!({"result": "u"}), true)
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_body_ends_with_newline() {
        let bytes = body_of(ExtJson::ok(json!({}), true).into_response()).await;
        assert_eq!(bytes.last(), Some(&b'\n'));
    }
}
