//! Canonical JSON and content hashing.
//!
//! Manifests carry a content hash so consumers can tell whether two exports
//! describe the same asset state:
//!
//! ```text
//! content_hash = hex(BLAKE3(JCS(manifest_json - {timestamp, content_hash})))
//! ```
//!
//! JCS is the JSON Canonicalization Scheme of RFC 8785.

use serde_json::Value;

/// Top-level manifest fields excluded from the content hash.
pub const VOLATILE_FIELDS: [&str; 2] = ["timestamp", "content_hash"];

/// Computes the canonical BLAKE3 hash of a JSON value.
///
/// Returns a 64-character lowercase hexadecimal string.
pub fn canonical_value_hash(value: &Value) -> String {
    let canonical = canonicalize_json(value);
    blake3_hash(canonical.as_bytes())
}

/// Computes the content hash of a manifest document.
///
/// Top-level [`VOLATILE_FIELDS`] are ignored, so two manifests built from the
/// same inputs at different times hash equal.
pub fn content_hash(manifest: &Value) -> String {
    match manifest {
        Value::Object(map) => {
            let mut stripped = map.clone();
            for field in VOLATILE_FIELDS {
                stripped.remove(field);
            }
            canonical_value_hash(&Value::Object(stripped))
        }
        other => canonical_value_hash(other),
    }
}

/// Canonicalizes a JSON value according to RFC 8785 (JCS).
///
/// - Object keys are sorted lexicographically
/// - No whitespace between tokens
/// - Strings use minimal escaping
pub fn canonicalize_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_jcs_number(n)),
        Value::String(s) => push_jcs_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_jcs_string(key, out);
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

fn format_jcs_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if !f.is_finite() => "null".to_string(),
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => {
            let s = format!("{}", f);
            if s.contains('.') && !s.contains(['e', 'E']) {
                s.trim_end_matches('0').trim_end_matches('.').to_string()
            } else {
                s
            }
        }
        None => "null".to_string(),
    }
}

fn push_jcs_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Computes a BLAKE3 hash of arbitrary data as lowercase hex.
pub fn blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonicalize_object_ordering() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a": 2, "b": 1}"#).unwrap();
        assert_eq!(canonicalize_json(&a), canonicalize_json(&b));
        assert_eq!(canonicalize_json(&a), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn test_canonicalize_nested_and_strings() {
        let value = json!({"z": [1, 2.50, true], "a": {"text": "x\ny", "n": null}});
        assert_eq!(
            canonicalize_json(&value),
            r#"{"a":{"n":null,"text":"x\ny"},"z":[1,2.5,true]}"#
        );
    }

    #[test]
    fn test_content_hash_ignores_volatile_fields() {
        let a = json!({"asset_name": "SM_Crate", "timestamp": "2026-01-01T00:00:00Z", "content_hash": ""});
        let b = json!({"asset_name": "SM_Crate", "timestamp": "2026-06-30T12:00:00Z", "content_hash": "abc"});
        let c = json!({"asset_name": "SM_Barrel", "timestamp": "2026-01-01T00:00:00Z"});

        assert_eq!(content_hash(&a), content_hash(&b));
        assert_ne!(content_hash(&a), content_hash(&c));
        assert_eq!(content_hash(&a).len(), 64);
    }

    #[test]
    fn test_nested_timestamp_is_hashed() {
        let a = json!({"export": {"timestamp": "1"}});
        let b = json!({"export": {"timestamp": "2"}});
        assert_ne!(content_hash(&a), content_hash(&b));
    }
}
