//! CLI-specific error types
//!
//! All CLI errors are fatal; the process exits non-zero.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: CliError = ConfigError::Invalid("no collections".to_string()).into();
        assert!(err.to_string().contains("no collections"));
    }
}
