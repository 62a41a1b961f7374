//! # Query Parameter Parser
//!
//! Parses the `list` operation's query-string parameters into a structured
//! find specification.

use std::collections::HashMap;

use super::errors::{GatewayError, GatewayResult};
use super::extjson;
use crate::store::FindSpec;

/// Parsed `list` parameters
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Maximum number of documents to return (0 = unlimited)
    pub limit: u64,

    /// Number of matching documents to skip, applied before the limit
    pub skip: u64,

    /// Extended JSON filter document
    pub filter: Option<bson::Document>,

    /// Extended JSON projection document
    pub projection: Option<bson::Document>,
}

impl ListParams {
    /// Parse query parameters from a HashMap. Unrecognized keys are ignored.
    pub fn parse(params: &HashMap<String, String>) -> GatewayResult<Self> {
        let mut result = ListParams::default();

        for (key, value) in params {
            match key.as_str() {
                "limit" => {
                    result.limit = parse_count(key, value)?;
                }
                "skip" => {
                    result.skip = parse_count(key, value)?;
                }
                "query" => {
                    result.filter = Some(extjson::decode_str(value)?);
                }
                "projection" => {
                    result.projection = Some(extjson::decode_str(value)?);
                }
                _ => {}
            }
        }

        Ok(result)
    }

    pub fn into_find_spec(self) -> FindSpec {
        FindSpec {
            filter: self.filter,
            projection: self.projection,
            limit: self.limit,
            skip: self.skip,
        }
    }
}

/// Parse a non-negative integer parameter
fn parse_count(name: &str, value: &str) -> GatewayResult<u64> {
    value.parse().map_err(|_| GatewayError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    })
}
