//! Core types for Emissary
//!
//! This crate holds everything about the store's data model that needs no
//! I/O: the canonical [`Value`] enum, the fixed [`TypeTag`] wire tags, the
//! tagging codec, the key path normalizer, and the tree reconstructor that
//! folds a flat key listing back into a nested mapping.
//!
//! The operation engine and HTTP transport live in `emissary-client`.

pub mod codec;
pub mod entry;
pub mod error;
pub mod path;
pub mod tag;
pub mod tree;
pub mod value;

pub use codec::{decode, decode_body, encode};
pub use entry::{DecodedEntry, KvEntry, KvPair};
pub use error::{Error, Result};
pub use path::normalize;
pub use tag::{tag_for, TypeTag};
pub use tree::build_tree;
pub use value::Value;
