//! Content-hash keys.
//!
//! A key is the first [`KEY_LENGTH`] hex digits of the MD5 digest of a
//! text's canonical source form: the JSON-quoted literal for plain strings,
//! the regenerated template source (holes included) for templates. Line
//! breaks and surrounding whitespace are stripped before hashing so that a
//! reformatted literal keeps its key.

use md5::{Digest, Md5};
use serde_json::Value;

use crate::utils::normalize_text;

pub const KEY_LENGTH: usize = 15;

pub fn derive_key(canonical_source: &str) -> String {
    let canonical = normalize_text(canonical_source);
    let digest = Md5::digest(canonical.as_bytes());
    let mut key = format!("{:x}", digest);
    key.truncate(KEY_LENGTH);
    key
}

/// Canonical source form of a plain string value: its JSON-quoted form.
pub fn literal_source(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}
