// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub fn stable_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let raw = serde_json::to_value(value)?;
    let normalized = normalize_json_value(raw);
    serde_json::to_vec(&normalized)
}

pub fn stable_json_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = stable_json_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// Weak entity tag for a serializable record, quoted as HTTP expects.
pub fn entity_tag<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let hash = stable_json_hash_hex(value)?;
    Ok(format!("\"{}\"", &hash[..16]))
}

fn normalize_json_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(k, v)| (k, normalize_json_value(v)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, v);
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_json_value).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_tag_is_quoted_and_short() {
        let tag = entity_tag(&json!({"a": 1})).expect("etag");
        assert!(tag.starts_with('"') && tag.ends_with('"'));
        assert_eq!(tag.len(), 18);
    }
}
