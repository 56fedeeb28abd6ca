//! Wire codec: application values to and from tagged store bodies
//!
//! [`encode`] turns a [`Value`] into the string body written to the store
//! plus the [`TypeTag`] that travels in the `Flags` field. [`decode`]
//! reverses it. Both are total:
//!
//! - `encode` has no error path; an unrecognizable shape cannot occur
//!   because the enum is closed, and JSON rendering of a value cannot fail.
//! - `decode` treats the stored bytes as untrusted (they may come from a
//!   non-conforming writer) and recovers locally: malformed JSON under a
//!   sequence tag falls back to the raw string, under a record tag to an
//!   empty record; non-numeric text under a numeric tag falls back to the
//!   raw string.
//!
//! Collections are pretty-printed, not compact: bodies stay readable when
//! inspecting the store directly.

use crate::tag::{record_from_fields, tag_for, TypeTag};
use crate::value::Value;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::collections::BTreeMap;

/// Encode a value into its wire body and type tag.
pub fn encode(value: &Value) -> (String, TypeTag) {
    let tag = tag_for(value);
    let body = match value {
        Value::String(s) => s.clone(),
        Value::Null => "nil".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Atom(a) => a.clone(),
        Value::Array(_) | Value::Object(_) | Value::Record { .. } => pretty_json(value.clone()),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
    };
    (body, tag)
}

/// Decode a wire body under the given type tag.
///
/// Never fails; see the module docs for the fallback rules.
pub fn decode(body: &str, tag: TypeTag) -> Value {
    match tag {
        TypeTag::Text | TypeTag::Unknown(_) => Value::String(body.to_string()),
        TypeTag::Null => Value::Null,
        TypeTag::True => Value::Bool(true),
        TypeTag::False => Value::Bool(false),
        TypeTag::Atom => Value::Atom(body.to_string()),
        TypeTag::Sequence => decode_sequence(body),
        TypeTag::Record(flags) => decode_record(body, flags),
        TypeTag::Int | TypeTag::BigInt => match body.trim().parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => {
                tracing::warn!(target: "emissary::codec", tag = tag.flags(), "non-numeric body under integer tag");
                Value::String(body.to_string())
            }
        },
        // Best-effort numeric re-parse; rationals and complexes that do not
        // read as f64 survive as their string form (documented lossy).
        TypeTag::Float | TypeTag::Rational | TypeTag::Complex => match body.trim().parse::<f64>() {
            Ok(f) => Value::Float(f),
            Err(_) => Value::String(body.to_string()),
        },
    }
}

/// Decode a raw transport body: base64 first, then the tag rules.
///
/// The store carries values base64-encoded inside its JSON listing, and a
/// directory entry carries no value at all. A missing body, bad base64, or
/// non-UTF-8 payload yields the tag's fixed value where it has one (tags
/// 1-3) and null otherwise, never an error.
pub fn decode_body(raw: Option<&str>, tag: TypeTag) -> Value {
    let text = raw
        .and_then(|b64| BASE64.decode(b64).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok());
    match text {
        Some(body) => decode(&body, tag),
        None => match tag {
            TypeTag::Null => Value::Null,
            TypeTag::True => Value::Bool(true),
            TypeTag::False => Value::Bool(false),
            _ => Value::Null,
        },
    }
}

fn decode_sequence(body: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(parsed) => Value::from(parsed),
        Err(_) => {
            tracing::warn!(target: "emissary::codec", "malformed JSON under sequence tag");
            Value::String(body.to_string())
        }
    }
}

fn decode_record(body: &str, flags: u64) -> Value {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(obj)) => {
            let fields: BTreeMap<String, Value> =
                obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
            record_from_fields(flags, fields)
        }
        _ => {
            tracing::warn!(target: "emissary::codec", tag = flags, "malformed JSON under record tag");
            record_from_fields(flags, BTreeMap::new())
        }
    }
}

fn pretty_json(value: Value) -> String {
    let json: serde_json::Value = value.into();
    // Rendering a serde_json::Value cannot fail
    serde_json::to_string_pretty(&json).unwrap_or_default()
}
