use crate::commands::CommandError;
use std::path::PathBuf;
use thiserror::Error;

pub type AppResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading the credential table at startup.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The credential file does not exist. Fatal: the server must not start.
    #[error("credentials file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read credentials file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigErrorKind {
    #[error("failed to read file: {0}")]
    Read(std::io::Error),

    #[error("failed to parse file: {0}")]
    Parse(toml::de::Error),

    #[error("invalid environment variable {0}: {1}")]
    InvalidEnv(String, String),

    #[error("invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigErrorKind,
    },

    #[error("invalid configuration from environment: {0}")]
    Env(#[source] ConfigErrorKind),

    #[error("invalid listen address {addr}: {message}")]
    Addr { addr: String, message: String },

    #[error("network issue: {0}")]
    Net(String),
}
