//! The canonical metadata record describing one object in the lake.

use crate::errors::{MetadataError, MetadataResult};
use crate::services::normalizer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema version this crate reads and writes.
pub const METADATA_VERSION: i64 = 0;

/// Fields that must be present and non-null once defaults are applied,
/// in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 6] = ["version", "start", "where", "what", "id", "hash"];

/// A validated, normalized metadata record.
///
/// Known fields are typed; anything else the caller supplied is carried in
/// `extra` untouched. Serializes to the flat mapping stored alongside the
/// object, and deserializing always goes through [`normalizer::normalize`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct Metadata {
    /// Opaque identifier; a random 128-bit hex token unless supplied.
    pub id: String,

    /// Schema version, always [`METADATA_VERSION`].
    pub version: i64,

    /// Logical unit of work this record belongs to, if any.
    pub work_id: Option<String>,

    /// Start of the described interval, epoch milliseconds.
    pub start: i64,

    /// End of the described interval, epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,

    /// Origin of the object (host, sensor, pipeline stage...).
    pub r#where: String,

    /// What kind of content the object holds.
    pub what: String,

    /// Content hash of the object.
    pub hash: String,

    /// Pass-through fields with no meaning to the normalizer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// Parse JSON text and normalize the resulting object.
    pub fn from_json_str(text: &str) -> MetadataResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| MetadataError::invalid(format!("metadata is not valid JSON: {err}")))?;
        normalizer::normalize_value(&value)
    }

    /// Flatten the record back into the canonical mapping.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        map.insert("id".into(), Value::from(self.id.clone()));
        map.insert("version".into(), Value::from(self.version));
        map.insert(
            "work_id".into(),
            self.work_id.clone().map(Value::from).unwrap_or(Value::Null),
        );
        map.insert("start".into(), Value::from(self.start));
        if let Some(end) = self.end {
            map.insert("end".into(), Value::from(end));
        }
        map.insert("where".into(), Value::from(self.r#where.clone()));
        map.insert("what".into(), Value::from(self.what.clone()));
        map.insert("hash".into(), Value::from(self.hash.clone()));
        map
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.start)
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end.and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

impl TryFrom<Map<String, Value>> for Metadata {
    type Error = MetadataError;

    fn try_from(map: Map<String, Value>) -> MetadataResult<Self> {
        normalizer::normalize(&map)
    }
}

impl TryFrom<Value> for Metadata {
    type Error = MetadataError;

    fn try_from(value: Value) -> MetadataResult<Self> {
        normalizer::normalize_value(&value)
    }
}

impl From<Metadata> for Value {
    fn from(record: Metadata) -> Self {
        Value::Object(record.to_map())
    }
}
