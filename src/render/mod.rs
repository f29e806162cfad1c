//! Serialization of inferred documents.

mod json;

pub use json::{to_json, JsonFormat};
