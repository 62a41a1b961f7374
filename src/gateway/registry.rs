//! # Collection Registry
//!
//! Static allow-list of collection names. The check runs before any other
//! per-request work and is the sole access gate in the system.

use std::collections::HashSet;

use super::errors::{GatewayError, GatewayResult};

/// The configured set of exposed collections
#[derive(Debug, Clone)]
pub struct CollectionRegistry {
    allowed: HashSet<String>,
}

/// A collection name that has passed the allow-list check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionName<'a>(&'a str);

impl<'a> CollectionName<'a> {
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl CollectionRegistry {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed: names.into_iter().collect(),
        }
    }

    /// Authorize a requested collection name.
    ///
    /// Names outside the allow-list are indistinguishable from routes that
    /// do not exist (404).
    pub fn authorize<'a>(&self, name: &'a str) -> GatewayResult<CollectionName<'a>> {
        if self.allowed.contains(name) {
            Ok(CollectionName(name))
        } else {
            Err(GatewayError::UnknownCollection(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CollectionRegistry {
        CollectionRegistry::new(["items".to_string(), "users".to_string()])
    }

    #[test]
    fn test_allowed_collection_passes() {
        let name = registry().authorize("items").unwrap();
        assert_eq!(name.as_str(), "items");
    }

    #[test]
    fn test_unknown_collection_is_404() {
        let err = registry().authorize("secrets").unwrap_err();
        assert_eq!(err.kind(), "UnknownCollection");
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = CollectionRegistry::new([]);
        assert!(registry.authorize("items").is_err());
    }
}
