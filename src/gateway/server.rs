//! # Resource Dispatcher
//!
//! Axum router and handlers mapping HTTP verbs onto store operations:
//!
//! | Verb   | Id in path | Operation |
//! |--------|------------|-----------|
//! | GET    | no         | list      |
//! | GET    | yes        | getOne    |
//! | POST   | no         | insert    |
//! | PUT    | yes        | update    |
//! | DELETE | yes        | delete    |
//!
//! Any other combination falls through to the framework's 404/405.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Host, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::{DocumentStore, StoreError};

use super::errors::GatewayError;
use super::extjson;
use super::oid;
use super::params::ListParams;
use super::registry::CollectionRegistry;
use super::response::ExtJson;

/// Gateway server state: the store handle and the collection allow-list,
/// both fixed for the process lifetime.
pub struct GatewayServer<S: DocumentStore> {
    store: S,
    registry: CollectionRegistry,
}

/// Shared state type
type ServerState<S> = Arc<GatewayServer<S>>;

impl<S: DocumentStore + 'static> GatewayServer<S> {
    pub fn new(store: S, registry: CollectionRegistry) -> Self {
        Self { store, registry }
    }

    /// Build the Axum router.
    ///
    /// Both `/<collection>` and `/<collection>/` are accepted for the
    /// collection-level operations.
    pub fn router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route(
                "/:collection",
                get(list_handler::<S>).post(insert_handler::<S>),
            )
            .route(
                "/:collection/",
                get(list_handler::<S>).post(insert_handler::<S>),
            )
            .route(
                "/:collection/:id",
                get(get_handler::<S>)
                    .put(update_handler::<S>)
                    .delete(delete_handler::<S>),
            )
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

/// XHR-style request marker selects compact output; interactive requests get
/// pretty-printed bodies. Cosmetic only.
fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .map(|v| v == "XMLHttpRequest")
        .unwrap_or(false)
}

/// Request scheme for building created-resource URLs. Honors the usual
/// proxy header; plain deployments are http.
fn request_scheme(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http")
}

/// `GET /<collection>/` — list matching documents
async fn list_handler<S: DocumentStore + 'static>(
    State(server): State<ServerState<S>>,
    Path(collection): Path<String>,
    Query(raw): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let collection = server.registry.authorize(&collection)?;
    let params = ListParams::parse(&raw)?;

    let documents = server
        .store
        .find(collection.as_str(), params.into_find_spec())
        .await?;

    Ok(ExtJson::ok(extjson::to_array_value(&documents), is_xhr(&headers)).into_response())
}

/// `GET /<collection>/<id>` — fetch one document
async fn get_handler<S: DocumentStore + 'static>(
    State(server): State<ServerState<S>>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let collection = server.registry.authorize(&collection)?;
    let id = oid::decode(&id)?;

    let document = server
        .store
        .find_one(collection.as_str(), id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(oid::encode(id)))?;

    Ok(ExtJson::ok(extjson::to_value(&document), is_xhr(&headers)).into_response())
}

/// `POST /<collection>/` — insert a document, answer 201 with the absolute
/// URL of the created resource
async fn insert_handler<S: DocumentStore + 'static>(
    State(server): State<ServerState<S>>,
    Path(collection): Path<String>,
    Host(host): Host,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let collection = server.registry.authorize(&collection)?;
    let document = extjson::decode(&body)?;

    let inserted_id = server
        .store
        .insert_one(collection.as_str(), document.clone())
        .await
        .map_err(|err| match err {
            StoreError::Rejected(diagnostic) => GatewayError::InsertRejected {
                document: extjson::to_value(&document),
                diagnostic,
            },
            other => GatewayError::from(other),
        })?;

    let url = format!(
        "{}://{}/{}/{}",
        request_scheme(&headers),
        host,
        collection.as_str(),
        oid::id_segment(&inserted_id),
    );
    tracing::debug!(collection = collection.as_str(), %url, "document created");

    Ok(ExtJson::new(StatusCode::CREATED, json!({ "result": url }), is_xhr(&headers))
        .into_response())
}

/// `PUT /<collection>/<id>` — apply an update specification
///
/// The body is handed to the store verbatim, so it must carry update
/// operators. Replacement-style bodies come back as `UpdateRejected`.
async fn update_handler<S: DocumentStore + 'static>(
    State(server): State<ServerState<S>>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let collection = server.registry.authorize(&collection)?;
    let id = oid::decode(&id)?;
    let update = extjson::decode(&body)?;

    let acknowledged = server
        .store
        .update_one(collection.as_str(), id, update.clone())
        .await
        .map_err(|err| match err {
            StoreError::Rejected(diagnostic) => GatewayError::UpdateRejected {
                document: extjson::to_value(&update),
                diagnostic,
            },
            other => GatewayError::from(other),
        })?;

    Ok(ExtJson::ok(json!({ "acknowledged": acknowledged }), is_xhr(&headers)).into_response())
}

/// `DELETE /<collection>/<id>` — remove a document if present; always 204
async fn delete_handler<S: DocumentStore + 'static>(
    State(server): State<ServerState<S>>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Response, GatewayError> {
    let collection = server.registry.authorize(&collection)?;
    let id = oid::decode(&id)?;

    server.store.delete_one(collection.as_str(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_router_builds() {
        let registry = CollectionRegistry::new(["items".to_string()]);
        let server = GatewayServer::new(MemoryStore::new(), registry);
        let _router = server.router();
    }

    #[test]
    fn test_xhr_marker() {
        let mut headers = HeaderMap::new();
        assert!(!is_xhr(&headers));
        headers.insert("x-requested-with", "XMLHttpRequest".parse().unwrap());
        assert!(is_xhr(&headers));
    }

    #[test]
    fn test_scheme_defaults_to_http() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_scheme(&headers), "http");
        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        assert_eq!(request_scheme(&headers), "https");
    }
}
