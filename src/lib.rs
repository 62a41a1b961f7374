//! docgate - A generic HTTP-to-MongoDB REST gateway
//!
//! Exposes a configured set of collections as REST resources, translating
//! HTTP verbs into store operations and documents into extended JSON.

pub mod cli;
pub mod config;
pub mod gateway;
pub mod observability;
pub mod store;
