//! Error types for the Wayfarer stack

use std::path::PathBuf;
use wayfarer_graph::{DeployError, GraphBuilderError};

/// Main stack error type
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    /// Configuration or call-order error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resource graph rejected a registration
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphBuilderError),

    /// Provisioning failed; surfaced as reported by the engine
    #[error("deployment failed: {0}")]
    Deploy(#[from] DeployError),

    /// The plan did not export the expected output
    #[error("missing stack output: {0}")]
    MissingOutput(String),
}

impl InfraError {
    /// Errors the caller fixes by changing configuration or call order
    #[inline]
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Graph(_))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment name unusable in resource names
    #[error(
        "invalid environment name {0:?}: expected 1-78 letters, digits, '-', '_', '.', '(' or ')'"
    )]
    InvalidEnvironment(String),

    #[error("invalid location {0:?}")]
    InvalidLocation(String),

    #[error("invalid DNS zone {0:?}")]
    InvalidDnsZone(String),

    #[error("invalid storage account name {name:?}: {reason}")]
    InvalidStorageAccountName { name: String, reason: String },

    /// Static website requested for an account this stack never created
    #[error("Storage Account must be created before enabling static website")]
    StorageAccountMissing,

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
