//! # Extended JSON Codec
//!
//! Serializes documents to and from MongoDB relaxed extended JSON, the
//! encoding that preserves object ids, dates and binary data as tagged
//! sub-documents (`{"$oid": ...}`, `{"$date": ...}`, `{"$binary": ...}`).
//!
//! Encoding comes in two cosmetic flavors: `compact = true` uses minimal
//! separators (programmatic/XHR callers), `compact = false` pretty-prints
//! (interactive callers). Both decode to identical values.

use bson::{Bson, Document};

use super::errors::{GatewayError, GatewayResult};

/// Decode extended JSON bytes into a document.
pub fn decode(bytes: &[u8]) -> GatewayResult<Document> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| GatewayError::MalformedBody(e.to_string()))?;
    match value {
        serde_json::Value::Object(map) => Document::try_from(map)
            .map_err(|e| GatewayError::MalformedBody(e.to_string())),
        other => Err(GatewayError::MalformedBody(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Decode an extended JSON query-string parameter.
pub fn decode_str(text: &str) -> GatewayResult<Document> {
    decode(text.as_bytes())
}

/// Render a document as a plain [`serde_json::Value`] in relaxed extended
/// JSON form.
pub fn to_value(document: &Document) -> serde_json::Value {
    Bson::Document(document.clone()).into_relaxed_extjson()
}

/// Render a sequence of documents as a JSON array value.
pub fn to_array_value(documents: &[Document]) -> serde_json::Value {
    serde_json::Value::Array(documents.iter().map(to_value).collect())
}

/// Encode a JSON value into bytes.
pub fn encode(value: &serde_json::Value, compact: bool) -> serde_json::Result<Vec<u8>> {
    if compact {
        serde_json::to_vec(value)
    } else {
        serde_json::to_vec_pretty(value)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
