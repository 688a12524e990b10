pub mod content_hash;
pub mod normalizer;
pub mod timestamps;
