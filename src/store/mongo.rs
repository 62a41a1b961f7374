//! # MongoDB Backend
//!
//! Production [`DocumentStore`] over the MongoDB driver. One client is opened
//! per process at bootstrap and cloned cheaply into request handlers; the
//! driver manages the underlying connection pool.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use futures_util::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Collection};

use super::{DocumentStore, FindSpec, StoreError};

#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    /// Connect to the database named by the URI path.
    ///
    /// The URI must carry a default database (`mongodb://host/dbname`);
    /// without one there is nothing to scope collections to.
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::Initialization(e.to_string()))?;
        let database = options
            .default_database
            .clone()
            .ok_or_else(|| {
                StoreError::Initialization(
                    "connection uri does not name a database".to_string(),
                )
            })?;
        let client = Client::with_options(options)
            .map_err(|e| StoreError::Initialization(e.to_string()))?;
        Ok(Self { client, database })
    }

    /// Named collection handle; purely a lookup.
    fn collection(&self, name: &str) -> Collection<Document> {
        self.client.database(&self.database).collection(name)
    }
}

/// Classify a driver error: write/command failures are rejections the client
/// caused, everything else is a server fault.
fn classify(err: mongodb::error::Error) -> StoreError {
    use mongodb::error::ErrorKind;
    let message = err.to_string();
    match err.kind.as_ref() {
        ErrorKind::Write(_)
        | ErrorKind::Command(_)
        | ErrorKind::InvalidArgument { .. } => StoreError::Rejected(message),
        _ => StoreError::Unavailable(message),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, collection: &str, spec: FindSpec) -> Result<Vec<Document>, StoreError> {
        let options = FindOptions::builder()
            .limit(if spec.limit > 0 {
                Some(spec.limit as i64)
            } else {
                None
            })
            .skip(if spec.skip > 0 { Some(spec.skip) } else { None })
            .projection(spec.projection)
            .build();

        self.collection(collection)
            .find(spec.filter, options)
            .await
            .map_err(classify)?
            .try_collect()
            .await
            .map_err(classify)
    }

    async fn find_one(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(classify)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson, StoreError> {
        let result = self
            .collection(collection)
            .insert_one(document, None)
            .await
            .map_err(classify)?;
        Ok(result.inserted_id)
    }

    async fn update_one(
        &self,
        collection: &str,
        id: ObjectId,
        update: Document,
    ) -> Result<bool, StoreError> {
        // The update document is passed through verbatim; the server rejects
        // bodies without update operators.
        self.collection(collection)
            .update_one(doc! { "_id": id }, update, None)
            .await
            .map_err(classify)?;
        // With the default write concern, every Ok is an acknowledged write.
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<(), StoreError> {
        self.collection(collection)
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(classify)?;
        Ok(())
    }
}
