pub mod hash_handlers;
pub mod normalize_handlers;
