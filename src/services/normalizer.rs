//! Record normalizer: turns an arbitrary caller mapping into a [`Metadata`]
//! record or rejects it.
//!
//! The pipeline runs in a fixed order:
//! 1. copy the input so the record never shares state with the caller
//! 2. fill `id`, `version` and `work_id` when absent
//! 3. check required fields, then the schema version, then field types
//! 4. normalize `start` and `end` to epoch milliseconds
//!
//! The order matters: an input with an unparsable `start` and a foreign
//! `version` is reported as a version problem, not a parse problem.

use crate::errors::{MetadataError, MetadataResult};
use crate::models::metadata::{METADATA_VERSION, Metadata, REQUIRED_FIELDS};
use crate::services::timestamps::normalize_timestamp;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

/// Normalize a JSON value, which must be an object.
pub fn normalize_value(input: &Value) -> MetadataResult<Metadata> {
    match input {
        Value::Object(map) => normalize(map),
        other => Err(MetadataError::invalid(format!(
            "metadata must be a JSON object, found {}",
            json_type_name(other)
        ))),
    }
}

/// Build a canonical record from `input`.
///
/// The input is only borrowed and deep-copied; later changes to it are never
/// seen by the returned record and vice versa.
pub fn normalize(input: &Map<String, Value>) -> MetadataResult<Metadata> {
    let mut fields = input.clone();

    ensure_defaults(&mut fields);
    validate_required_fields(&fields)?;
    validate_version(&fields)?;

    let record = build_record(fields)?;
    debug!(id = %record.id, what = %record.what, "normalized metadata record");
    Ok(record)
}

/// Random 128-bit identifier as 32 lowercase hex characters.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn ensure_defaults(fields: &mut Map<String, Value>) {
    if !fields.contains_key("id") {
        let id = generate_id();
        debug!(%id, "assigned metadata id");
        fields.insert("id".into(), Value::String(id));
    }
    if !fields.contains_key("version") {
        fields.insert("version".into(), Value::from(METADATA_VERSION));
    }
    if !fields.contains_key("work_id") {
        fields.insert("work_id".into(), Value::Null);
    }
}

fn validate_required_fields(fields: &Map<String, Value>) -> MetadataResult<()> {
    for field in REQUIRED_FIELDS {
        if fields.get(field).is_none_or(Value::is_null) {
            return Err(MetadataError::invalid(format!(
                "\"{field}\" is a required field"
            )));
        }
    }
    Ok(())
}

fn validate_version(fields: &Map<String, Value>) -> MetadataResult<()> {
    let found = fields.get("version").cloned().unwrap_or(Value::Null);
    // numeric equality: 0, 0.0 and -0.0 are all version 0, "0" is not
    if found.as_f64() == Some(METADATA_VERSION as f64) {
        Ok(())
    } else {
        Err(MetadataError::UnsupportedMetadataVersion {
            found,
            supported: METADATA_VERSION,
        })
    }
}

/// Move the known fields out of `fields`; whatever remains is pass-through.
fn build_record(mut fields: Map<String, Value>) -> MetadataResult<Metadata> {
    let id = take_text(&mut fields, "id")?;
    let r#where = take_text(&mut fields, "where")?;
    let what = take_text(&mut fields, "what")?;
    let hash = take_text(&mut fields, "hash")?;
    let work_id = match fields.remove("work_id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            return Err(MetadataError::invalid(format!(
                "\"work_id\" must be text or null, found {}",
                json_type_name(&other)
            )));
        }
    };
    fields.remove("version");

    let start = match fields.remove("start") {
        Some(value) => normalize_timestamp("start", &value)?,
        None => return Err(MetadataError::invalid("\"start\" is a required field")),
    };
    let end = match fields.remove("end") {
        None | Some(Value::Null) => None,
        Some(value) => Some(normalize_timestamp("end", &value)?),
    };

    Ok(Metadata {
        id,
        version: METADATA_VERSION,
        work_id,
        start,
        end,
        r#where,
        what,
        hash,
        extra: fields,
    })
}

fn take_text(fields: &mut Map<String, Value>, field: &str) -> MetadataResult<String> {
    match fields.remove(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(MetadataError::invalid(format!(
            "\"{field}\" must be text, found {}",
            json_type_name(&other)
        ))),
        None => Err(MetadataError::invalid(format!(
            "\"{field}\" is a required field"
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    #[test]
    fn generated_ids_are_128_bit_hex() {
        let id = generate_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, generate_id());
    }

    #[test]
    fn null_counts_as_present_for_defaults() {
        // work_id: null is kept as null, id: null is not replaced and fails
        let err = normalize(&input(json!({
            "id": null, "start": 1, "where": "w", "what": "x", "hash": "h"
        })))
        .unwrap_err();
        assert_eq!(err, MetadataError::invalid("\"id\" is a required field"));
    }

    #[test]
    fn required_fields_are_checked_in_order() {
        let err = normalize(&input(json!({}))).unwrap_err();
        assert_eq!(err, MetadataError::invalid("\"start\" is a required field"));

        let err = normalize(&input(json!({"start": 1, "what": "x"}))).unwrap_err();
        assert_eq!(err, MetadataError::invalid("\"where\" is a required field"));
    }

    #[test]
    fn version_is_checked_before_types_and_dates() {
        let err = normalize(&input(json!({
            "version": 7, "start": "not-a-date", "where": 5, "what": "x", "hash": "h"
        })))
        .unwrap_err();
        assert_eq!(
            err,
            MetadataError::UnsupportedMetadataVersion {
                found: json!(7),
                supported: 0
            }
        );
    }

    #[test]
    fn float_zero_is_the_current_version() {
        for version in [json!(0.0), json!(-0.0)] {
            let rec = normalize(&input(json!({
                "version": version, "start": 1, "where": "w", "what": "x", "hash": "h"
            })))
            .unwrap();
            assert_eq!(rec.version, METADATA_VERSION);
            assert_eq!(rec.to_map()["version"], json!(0));
        }

        let value: Value =
            serde_json::from_str(r#"{"version": -0, "start": 1, "where": "w", "what": "x", "hash": "h"}"#)
                .unwrap();
        assert!(normalize_value(&value).is_ok());
    }

    #[test]
    fn types_are_checked_before_dates() {
        let err = normalize(&input(json!({
            "start": "not-a-date", "where": ["a"], "what": "x", "hash": "h"
        })))
        .unwrap_err();
        assert_eq!(
            err,
            MetadataError::invalid("\"where\" must be text, found an array")
        );
    }

    #[test]
    fn non_text_work_id_is_rejected() {
        let err = normalize(&input(json!({
            "start": 1, "where": "w", "what": "x", "hash": "h", "work_id": 12
        })))
        .unwrap_err();
        assert_eq!(err.kind(), "invalid_metadata");
    }

    #[test]
    fn null_end_is_dropped() {
        let rec = normalize(&input(json!({
            "start": 1, "end": null, "where": "w", "what": "x", "hash": "h"
        })))
        .unwrap();
        assert_eq!(rec.end, None);
        assert!(!rec.to_map().contains_key("end"));
    }

    #[test]
    fn non_objects_are_rejected() {
        let err = normalize_value(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err,
            MetadataError::invalid("metadata must be a JSON object, found an array")
        );
    }
}
