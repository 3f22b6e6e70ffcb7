use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Archive stream failed: {0}")]
    Stream(#[from] std::io::Error),

    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    #[error("Failed to persist snapshot: {0}")]
    Store(#[from] StoreError),
}

/// Error returned by icon set lookups.
///
/// Cloneable so a single failed load can be handed to every caller that was
/// waiting on it.
#[derive(Debug, Clone, Error)]
pub enum IconSetError {
    #[error(transparent)]
    Registry(Arc<RegistryError>),

    #[error("Version {0} not found in registry")]
    VersionNotFound(String),

    #[error(transparent)]
    Fetch(Arc<FetchError>),
}

impl From<RegistryError> for IconSetError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(Arc::new(e))
    }
}

impl From<FetchError> for IconSetError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(Arc::new(e))
    }
}
