//! Data model for lake metadata records.
//!
//! Records are built only through the normalizer, so every `Metadata` value
//! in hand already satisfies the schema. They serialize naturally as JSON via
//! `serde`.

pub mod metadata;
