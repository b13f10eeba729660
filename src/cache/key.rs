//! Cache key derivation.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// `"<endpoint>:<sha256 hex>"` over the endpoint and the parameters with object
/// keys sorted, so parameter order never changes the key.
pub fn cache_key(endpoint: &str, params: &Value) -> String {
    let canonical = canonicalize(params).to_string();
    let mut hasher = Sha256::new();
    hasher.update(endpoint.as_bytes());
    hasher.update(b":");
    hasher.update(canonical.as_bytes());
    format!("{endpoint}:{}", hex::encode(hasher.finalize()))
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
