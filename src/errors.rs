use serde_json::Value;
use thiserror::Error;

/// Rejection of a metadata mapping by the normalizer.
///
/// Both variants mean "do not persist this input". They are kept apart so
/// callers can route schema mismatches differently from malformed data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetadataError {
    /// A required field is missing or null, a field has the wrong type, or a
    /// timestamp could not be understood.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The record declares a schema version this crate does not understand.
    #[error("unsupported metadata version: found {found}, only {supported} is supported")]
    UnsupportedMetadataVersion { found: Value, supported: i64 },
}

impl MetadataError {
    /// Shortcut for an `InvalidMetadata` error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidMetadata(msg.into())
    }

    /// Stable machine-readable tag for reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidMetadata(_) => "invalid_metadata",
            Self::UnsupportedMetadataVersion { .. } => "unsupported_metadata_version",
        }
    }
}

pub type MetadataResult<T> = Result<T, MetadataError>;
