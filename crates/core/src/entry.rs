//! Store records
//!
//! The store answers a read with a JSON array of these records (always an
//! array, even for a single key). Only the store constructs a [`KvEntry`];
//! the client decodes its base64 `Value` field and never builds one by
//! hand.

use crate::codec::decode_body;
use crate::tag::TypeTag;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// One raw record as listed by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KvEntry {
    /// Flat store path
    pub key: String,
    /// Base64-encoded value body; absent for directory entries
    #[serde(default)]
    pub value: Option<String>,
    /// Wire type tag (see [`TypeTag`])
    #[serde(default)]
    pub flags: u64,
    /// Change index of the last write to this key
    #[serde(default)]
    pub modify_index: u64,
    /// Change index of the key's creation
    #[serde(default)]
    pub create_index: u64,
    /// Session lock counter, carried through untouched
    #[serde(default)]
    pub lock_index: u64,
}

impl KvEntry {
    /// The entry's type tag.
    pub fn tag(&self) -> TypeTag {
        TypeTag::from_flags(self.flags)
    }

    /// Decode this entry's value body.
    pub fn decode_value(&self) -> Value {
        decode_body(self.value.as_deref(), self.tag())
    }

    /// Decoded view of this entry, keeping the store metadata.
    pub fn decoded(&self) -> DecodedEntry {
        DecodedEntry {
            key: self.key.clone(),
            value: self.decode_value(),
            flags: self.flags,
            modify_index: self.modify_index,
            create_index: self.create_index,
            lock_index: self.lock_index,
        }
    }
}

/// A store record with its value decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntry {
    /// Flat store path
    pub key: String,
    /// Decoded value
    pub value: Value,
    /// Wire type tag
    pub flags: u64,
    /// Change index of the last write
    pub modify_index: u64,
    /// Change index of the key's creation
    pub create_index: u64,
    /// Session lock counter
    pub lock_index: u64,
}

/// A `(key, value)` pair from a multi-entry read.
#[derive(Debug, Clone, PartialEq)]
pub struct KvPair {
    /// Flat store path
    pub key: String,
    /// Decoded value
    pub value: Value,
}
