use std::path::PathBuf;

use thiserror::Error;

/// Failures of a [`ProfileStore`](crate::storage::store::ProfileStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to locate config dir")]
    NoConfigDir,

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Failures while deriving an agent or navigation URL.
#[derive(Error, Debug)]
pub enum UrlError {
    #[error("Invalid URL '{url}': {source}")]
    Parse {
        url: String,
        source: url::ParseError,
    },

    #[error("URL '{0}' cannot carry a host or port")]
    NotABase(String),

    #[error("No console page URL configured")]
    NoPageUrl,
}

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Unable to open {url}: {reason}")]
    Open { url: String, reason: String },
}

/// A central error enum for registry operations.
///
/// Expected network outcomes (refused, 401, timeouts) are not errors; they
/// are reported as [`ReachabilityVerdict`](crate::probe::verdict::ReachabilityVerdict) values.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unable to serialize connections: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Url(#[from] UrlError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("No connection named '{0}'")]
    UnknownConnection(String),

    /// The stored list could not be read in full; writing would lose records.
    #[error("Refusing to overwrite '{key}': {problem}")]
    UnreadableConnections { key: String, problem: String },
}
