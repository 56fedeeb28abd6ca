//! Emissary - typed client for a Consul-style versioned key/value store
//!
//! Emissary drives the store's read/write/wait protocol: it maps typed
//! application values onto the store's flat, tagged wire representation,
//! implements the blocking "wait for next value" read keyed on a change
//! index, and reconstructs hierarchical namespaces from the store's flat
//! key listing.
//!
//! # Quick Start
//!
//! ```ignore
//! use emissary::{Config, HttpTransport, Kv, Value};
//!
//! let config = Config::new("http://127.0.0.1:8500");
//! let kv = Kv::new(HttpTransport::new(), config);
//!
//! // Write a typed value (the type tag travels as a flags= parameter)
//! kv.put("service.web.port", Value::Int(8080), None)?;
//!
//! // Non-blocking read
//! let value = kv.get_value("service.web.port")?;
//! ```
//!
//! # Architecture
//!
//! The value model, codec, path normalizer, and tree reconstructor live in
//! `emissary-core`; the operation engine, transport boundary, and
//! configuration live in `emissary-client`. The HTTP transport is injected,
//! so tests drive the full protocol against a scripted double.

// Re-export the public API from the member crates
pub use emissary_client::*;
pub use emissary_core::*;
