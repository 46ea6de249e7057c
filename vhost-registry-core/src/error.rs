//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No record with the given id or hostname
    #[error("Domain record not found: {0}")]
    RecordNotFound(String),

    /// A disabled record cannot become the default
    #[error("Domain record is disabled: {0}")]
    RecordDisabled(String),

    /// Hostname already registered on an enabled record
    #[error("Hostname already in use: {0}")]
    HostnameExists(String),

    /// Validation error (hostname format, redirect code, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage write failed; the in-memory state was rolled back
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Negotiation produced no match and no default record exists
    #[error("No domain record resolves host: {0}")]
    UnresolvedHost(String),
}

impl CoreError {
    /// Whether this is expected behavior (user input, resource does not
    /// exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::RecordNotFound(_)
            | Self::RecordDisabled(_)
            | Self::HostnameExists(_)
            | Self::Validation(_)
            | Self::UnresolvedHost(_) => true,
            Self::Storage(_) | Self::Serialization(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
