//! # Identifier Codec
//!
//! Converts between the string path-segment form of a resource identifier
//! and the store's native `ObjectId`. Malformed segments are a client error.

use bson::oid::ObjectId;
use bson::Bson;

use super::errors::{GatewayError, GatewayResult};

/// Decode a path segment into an object id.
///
/// The segment must be the 24-character hex form of a 12-byte id.
pub fn decode(segment: &str) -> GatewayResult<ObjectId> {
    ObjectId::parse_str(segment)
        .map_err(|_| GatewayError::InvalidIdentifier(segment.to_string()))
}

/// Encode an object id into its path-segment form. Total; inverse of
/// [`decode`] for all valid ids.
pub fn encode(id: ObjectId) -> String {
    id.to_hex()
}

/// Path-segment form of an arbitrary inserted `_id`.
///
/// Clients may insert documents carrying their own `_id` of any type; the
/// created-resource URL uses the hex form for ObjectIds and a bare string
/// form otherwise. Only ObjectId segments are routable back through
/// `GET /<collection>/<id>`.
pub fn id_segment(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for _ in 0..8 {
            let id = ObjectId::new();
            assert_eq!(decode(&encode(id)).unwrap(), id);
        }
    }

    #[test]
    fn test_decode_rejects_malformed_segments() {
        assert!(decode("").is_err());
        assert!(decode("not-an-id").is_err());
        // Right length, not hex
        assert!(decode("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        // Hex, wrong length
        assert!(decode("deadbeef").is_err());
    }

    #[test]
    fn test_decode_error_is_client_error() {
        let err = decode("nope").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "InvalidIdentifier");
    }

    #[test]
    fn test_id_segment_forms() {
        let oid = ObjectId::new();
        assert_eq!(id_segment(&Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(id_segment(&Bson::String("custom".to_string())), "custom");
        assert_eq!(id_segment(&Bson::Int32(7)), "7");
    }
}
