//! Normalization and validation of data lake metadata records.
//!
//! Callers hand [`normalize`] an arbitrary JSON mapping describing a stored
//! object and get back either a canonical [`Metadata`] record or a
//! [`MetadataError`] explaining why the input must not be persisted.

pub mod errors;
pub mod models;
pub mod services;

pub use errors::{MetadataError, MetadataResult};
pub use models::metadata::{METADATA_VERSION, Metadata, REQUIRED_FIELDS};
pub use services::content_hash::{content_hash, file_hash};
pub use services::normalizer::{normalize, normalize_value};
pub use services::timestamps::{parse_timestamp, to_epoch_millis};
