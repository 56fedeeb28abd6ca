//! Wire type tags
//!
//! Every stored value carries a small integer tag in the store's `Flags`
//! field identifying how the body was serialized. The assignments are fixed
//! and must be preserved bit-for-bit: data written by existing clients is
//! decoded by the same numbers.
//!
//! | Tag | Meaning | Wire body |
//! |----:|---------|-----------|
//! | 0 | text (default/fallback) | the string itself |
//! | 1 | null | literal `nil` |
//! | 2 | boolean true | literal `true` |
//! | 3 | boolean false | literal `false` |
//! | 5 | symbolic atom | the atom's text |
//! | 6 | sequence | pretty-printed JSON array |
//! | 7, 31-37 | structured record | pretty-printed JSON object |
//! | 8, 10 | integer | decimal string |
//! | 9, 11, 12 | float / rational / complex | string form |
//!
//! Two fixed tables are initialized once at startup and never mutated: the
//! value-shape-to-tag mapping ([`tag_for`]) and the record registry mapping
//! record-family tags to a constructor ([`record_from_fields`]).

use crate::value::Value;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// A wire type tag, carried in the store's `Flags` field.
///
/// Closed enum over the fixed assignments. `Record` keeps its raw tag so
/// the whole 7 / 31-37 family round-trips; anything outside the table is
/// `Unknown` and decodes as raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Tag 0: plain text, also the universal fallback
    Text,
    /// Tag 1: null
    Null,
    /// Tag 2: boolean true
    True,
    /// Tag 3: boolean false
    False,
    /// Tag 5: symbolic atom
    Atom,
    /// Tag 6: ordered sequence, JSON array on the wire
    Sequence,
    /// Tags 7 and 31-37: structured record, JSON object on the wire
    Record(u64),
    /// Tag 8: integer
    Int,
    /// Tag 9: floating point
    Float,
    /// Tag 10: big integer (same decode as 8)
    BigInt,
    /// Tag 11: rational number
    Rational,
    /// Tag 12: complex number
    Complex,
    /// Any tag outside the fixed table
    Unknown(u64),
}

impl TypeTag {
    /// Map a raw `Flags` value onto its tag.
    pub fn from_flags(flags: u64) -> Self {
        match flags {
            0 => TypeTag::Text,
            1 => TypeTag::Null,
            2 => TypeTag::True,
            3 => TypeTag::False,
            5 => TypeTag::Atom,
            6 => TypeTag::Sequence,
            7 | 31..=37 => TypeTag::Record(flags),
            8 => TypeTag::Int,
            9 => TypeTag::Float,
            10 => TypeTag::BigInt,
            11 => TypeTag::Rational,
            12 => TypeTag::Complex,
            other => TypeTag::Unknown(other),
        }
    }

    /// The raw `Flags` value sent to the store.
    pub fn flags(&self) -> u64 {
        match self {
            TypeTag::Text => 0,
            TypeTag::Null => 1,
            TypeTag::True => 2,
            TypeTag::False => 3,
            TypeTag::Atom => 5,
            TypeTag::Sequence => 6,
            TypeTag::Record(f) => *f,
            TypeTag::Int => 8,
            TypeTag::Float => 9,
            TypeTag::BigInt => 10,
            TypeTag::Rational => 11,
            TypeTag::Complex => 12,
            TypeTag::Unknown(f) => *f,
        }
    }

    /// Wire type name for this tag (the tag-to-name lookup table).
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeTag::Text => "text",
            TypeTag::Null => "null",
            TypeTag::True => "true",
            TypeTag::False => "false",
            TypeTag::Atom => "atom",
            TypeTag::Sequence => "sequence",
            TypeTag::Record(_) => "record",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::BigInt => "bigint",
            TypeTag::Rational => "rational",
            TypeTag::Complex => "complex",
            TypeTag::Unknown(_) => "text",
        }
    }

    /// Whether this tag belongs to the structured-record family.
    pub fn is_record(&self) -> bool {
        matches!(self, TypeTag::Record(_))
    }
}

/// Map a value's shape onto the tag it is written with.
///
/// Total: every value has a tag, unrecognized shapes never occur because
/// the enum is closed.
pub fn tag_for(value: &Value) -> TypeTag {
    match value {
        Value::String(_) => TypeTag::Text,
        Value::Null => TypeTag::Null,
        Value::Bool(true) => TypeTag::True,
        Value::Bool(false) => TypeTag::False,
        Value::Atom(_) => TypeTag::Atom,
        Value::Array(_) => TypeTag::Sequence,
        Value::Object(_) => TypeTag::Record(GENERIC_RECORD_TAG),
        Value::Record { name, .. } => {
            TypeTag::Record(record_tag_for_name(name).unwrap_or(GENERIC_RECORD_TAG))
        }
        Value::Int(_) => TypeTag::Int,
        Value::Float(_) => TypeTag::Float,
    }
}

/// The tag an anonymous map is written with.
pub const GENERIC_RECORD_TAG: u64 = 7;

type RecordCtor = fn(BTreeMap<String, Value>) -> Value;

struct RecordType {
    name: &'static str,
    ctor: RecordCtor,
}

fn generic_map(fields: BTreeMap<String, Value>) -> Value {
    Value::Record {
        name: "map".to_string(),
        fields,
    }
}

/// Record registry: tag -> named record constructor.
///
/// Populated once at startup. Tags 31-37 are reserved for deployments with
/// their own record types; nothing registers them here, so they fall back
/// to a generic object on decode.
static RECORD_REGISTRY: Lazy<BTreeMap<u64, RecordType>> = Lazy::new(|| {
    let mut m = BTreeMap::new();
    m.insert(
        GENERIC_RECORD_TAG,
        RecordType {
            name: "map",
            ctor: generic_map,
        },
    );
    m
});

/// Construct the decoded value for a record-family tag.
///
/// A registered tag produces its named record; an unregistered tag falls
/// back to a plain [`Value::Object`].
pub fn record_from_fields(flags: u64, fields: BTreeMap<String, Value>) -> Value {
    match RECORD_REGISTRY.get(&flags) {
        Some(record) => (record.ctor)(fields),
        None => Value::Object(fields),
    }
}

/// Reverse registry lookup: record name -> tag.
pub fn record_tag_for_name(name: &str) -> Option<u64> {
    RECORD_REGISTRY
        .iter()
        .find(|(_, record)| record.name == name)
        .map(|(flags, _)| *flags)
}
