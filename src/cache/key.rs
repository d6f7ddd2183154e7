//! Request key derivation.
//!
//! A key is the SHA-256 of a canonical JSON document
//! `{"endpoint": ..., "params": {...}}` in which every object, at any depth,
//! is emitted with its members sorted by name. Parameter insertion order
//! therefore never changes the key.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Derive the 64-character hex key for an endpoint and its parameters.
pub fn request_key<'a, I>(endpoint: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let sorted: BTreeMap<&String, &Value> = params.into_iter().collect();
    let mut canonical_params = Map::new();
    for (name, value) in sorted {
        canonical_params.insert(name.clone(), canonicalize(value));
    }

    let mut document = Map::new();
    document.insert("endpoint".to_string(), Value::String(endpoint.to_string()));
    document.insert("params".to_string(), Value::Object(canonical_params));

    let serialized = Value::Object(document).to_string();
    hex::encode(Sha256::digest(serialized.as_bytes()))
}

// `Map` may preserve insertion order depending on serde_json features, so
// objects are rebuilt in sorted order explicitly.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(members) => {
            let sorted: BTreeMap<&String, &Value> = members.iter().collect();
            let mut rebuilt = Map::new();
            for (name, member) in sorted {
                rebuilt.insert(name.clone(), canonicalize(member));
            }
            Value::Object(rebuilt)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
