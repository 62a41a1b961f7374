//! CLI argument definitions using clap
//!
//! Commands:
//! - docgate serve [--config <path>] [--mongo-uri <uri>] [--collections <a,b>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docgate - A generic HTTP-to-MongoDB REST gateway
#[derive(Parser, Debug)]
#[command(name = "docgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gateway server
    Serve {
        /// Path to a JSON configuration file; without it, configuration
        /// comes from DOCGATE_* environment variables
        #[arg(long)]
        config: Option<PathBuf>,

        /// MongoDB connection URI override
        #[arg(long)]
        mongo_uri: Option<String>,

        /// Comma-separated collection allow-list override
        #[arg(long)]
        collections: Option<String>,

        /// Bind host override
        #[arg(long)]
        host: Option<String>,

        /// Bind port override
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate the configuration, then exit
    CheckConfig {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
