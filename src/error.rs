use thiserror::Error;

/// Failures of the network-facing lookups.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The entity lookup failed. Status errors, transport errors and bad
    /// payloads all collapse into this one outcome.
    #[error("entity not found: {0}")]
    NotFound(String),
    /// An enrichment or card request failed; only its own section degrades.
    #[error("section unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    pub fn unavailable(error: impl std::fmt::Display) -> Self {
        FetchError::Unavailable(error.to_string())
    }
}

/// Failures of the durable key/value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage document is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}
