//! REST gateway: dispatch, codecs, access guard and error translation.
//!
//! The request path is: registry check, verb-specific input parsing
//! (identifier and extended JSON codecs), store call, extended JSON
//! rendering. Failures short-circuit to the error taxonomy in [`errors`].

pub mod errors;
pub mod extjson;
pub mod oid;
pub mod params;
pub mod registry;
pub mod response;
pub mod server;

pub use errors::{ErrorBody, GatewayError, GatewayResult};
pub use registry::{CollectionName, CollectionRegistry};
pub use server::GatewayServer;
