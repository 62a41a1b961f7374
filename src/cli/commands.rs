//! CLI command implementations
//!
//! Boot sequence for `serve`: assemble configuration (file, environment,
//! flag overrides — in that order), validate it, initialize logging, connect
//! the store once, then hand the router to the runtime.

use std::path::PathBuf;

use tokio::net::TcpListener;

use crate::config::{parse_collection_list, GatewayConfig};
use crate::gateway::{CollectionRegistry, GatewayServer};
use crate::observability;
use crate::store::MongoStore;

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Parse arguments and dispatch to a command.
pub fn run() -> CliResult<()> {
    match Cli::parse_args().command {
        Command::Serve {
            config,
            mongo_uri,
            collections,
            host,
            port,
        } => serve(config, mongo_uri, collections, host, port),
        Command::CheckConfig { config } => check_config(config),
    }
}

/// Assemble the effective configuration from file, environment and flags.
fn assemble_config(
    config_path: Option<PathBuf>,
    mongo_uri: Option<String>,
    collections: Option<String>,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<GatewayConfig> {
    let mut config = match config_path {
        Some(path) => {
            let mut loaded = GatewayConfig::load(&path)?;
            loaded.apply_env()?;
            loaded
        }
        None => GatewayConfig::from_env()?,
    };

    if let Some(uri) = mongo_uri {
        config.mongo_uri = uri;
    }
    if let Some(list) = collections {
        config.collections = parse_collection_list(&list);
    }
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    config.validate()?;
    Ok(config)
}

fn serve(
    config_path: Option<PathBuf>,
    mongo_uri: Option<String>,
    collections: Option<String>,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<()> {
    let config = assemble_config(config_path, mongo_uri, collections, host, port)?;
    observability::init();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let store = MongoStore::connect(&config.mongo_uri).await?;
        let registry = CollectionRegistry::new(config.collections.clone());
        let server = GatewayServer::new(store, registry);

        let listener = TcpListener::bind(config.socket_addr()).await?;
        tracing::info!(
            addr = %config.socket_addr(),
            collections = config.collections.len(),
            "gateway listening"
        );
        axum::serve(listener, server.router()).await?;
        Ok(())
    })
}

fn check_config(config_path: Option<PathBuf>) -> CliResult<()> {
    let config = assemble_config(config_path, None, None, None, None)?;
    println!(
        "ok: {} collection(s) on {}",
        config.collections.len(),
        config.socket_addr()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides_win() {
        let config = assemble_config(
            None,
            Some("mongodb://db.example/items".to_string()),
            Some("items,users".to_string()),
            Some("127.0.0.1".to_string()),
            Some(9000),
        )
        .unwrap();
        assert_eq!(config.mongo_uri, "mongodb://db.example/items");
        assert_eq!(config.collections, vec!["items", "users"]);
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_missing_collections_is_fatal() {
        let result = assemble_config(
            None,
            Some("mongodb://db.example/items".to_string()),
            Some("".to_string()),
            None,
            None,
        );
        assert!(result.is_err());
    }
}
