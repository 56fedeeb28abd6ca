//! Tree reconstruction
//!
//! A recursive read returns the store's flat listing: ordered
//! `(path, value)` pairs. [`build_tree`] folds that listing back into a
//! nested object, one nesting level per path segment, the last segment
//! holding the decoded value.
//!
//! Per-entry trees are combined with a deep merge: when both sides hold an
//! object at the same key the merge recurses, otherwise the later entry
//! wins. Listing order is preserved in that sense - a later leaf at the
//! same path always overwrites an earlier one, never the reverse.

use crate::value::Value;
use std::collections::BTreeMap;

/// Fold an ordered flat listing into a nested object.
pub fn build_tree(pairs: &[(String, Value)]) -> Value {
    let mut master: BTreeMap<String, Value> = BTreeMap::new();
    for (path, value) in pairs {
        let entry = entry_tree(path, value.clone());
        deep_merge(&mut master, entry);
    }
    Value::Object(master)
}

/// Nest a single entry: one object level per segment, value at the leaf.
fn entry_tree(path: &str, value: Value) -> BTreeMap<String, Value> {
    let mut segments = path.split('/');
    // split always yields at least one segment
    let first = segments.next().unwrap_or_default().to_string();
    let rest: Vec<&str> = segments.collect();

    let mut tree = BTreeMap::new();
    if rest.is_empty() {
        tree.insert(first, value);
        return tree;
    }

    let mut nested = value;
    for segment in rest.iter().rev() {
        let mut level = BTreeMap::new();
        level.insert(segment.to_string(), nested);
        nested = Value::Object(level);
    }
    tree.insert(first, nested);
    tree
}

fn deep_merge(into: &mut BTreeMap<String, Value>, from: BTreeMap<String, Value>) {
    for (key, value) in from {
        match (into.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                into.insert(key, value);
            }
        }
    }
}
