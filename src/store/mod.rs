//! Store seam between the gateway dispatcher and the document database.
//!
//! The gateway talks to a [`DocumentStore`]; production traffic goes to
//! [`MongoStore`], tests run against [`MemoryStore`].

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use thiserror::Error;

/// Store-level errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store refused a write (constraint violation, malformed update
    /// operator, duplicate key, ...)
    #[error("{0}")]
    Rejected(String),

    /// The store could not be reached or failed mid-operation
    #[error("{0}")]
    Unavailable(String),

    /// Connection setup failed (bad URI, missing database name, ...)
    #[error("{0}")]
    Initialization(String),
}

/// A find request: optional filter and projection, skip applied before limit,
/// `limit == 0` means unlimited.
#[derive(Debug, Clone, Default)]
pub struct FindSpec {
    pub filter: Option<Document>,
    pub projection: Option<Document>,
    pub limit: u64,
    pub skip: u64,
}

/// The document-store operations the dispatcher needs.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch all documents matching the spec, in insertion order unless the
    /// store decides otherwise.
    async fn find(&self, collection: &str, spec: FindSpec) -> Result<Vec<Document>, StoreError>;

    /// Fetch the document with the given id, if any.
    async fn find_one(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert a document, letting the store assign an `_id` when the
    /// document does not supply one. Returns the inserted id.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson, StoreError>;

    /// Apply an update specification to the document with the given id.
    ///
    /// The specification is passed through verbatim, so it must use the
    /// store's update operators (`$set`, ...); a replacement-style body is
    /// refused by the store. Returns whether the write was acknowledged.
    /// Updating a missing document is an acknowledged no-op.
    async fn update_one(
        &self,
        collection: &str,
        id: ObjectId,
        update: Document,
    ) -> Result<bool, StoreError>;

    /// Delete the document with the given id. Deleting a missing document
    /// is not an error.
    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<(), StoreError>;
}
