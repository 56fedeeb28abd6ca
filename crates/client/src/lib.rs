//! Emissary client - the KV operation engine and its collaborators
//!
//! This crate drives the store's HTTP protocol: the get/wait behavior
//! matrix, tagged writes with optional compare-and-swap, and deletes. The
//! HTTP transport is a trait so the whole protocol runs against a scripted
//! double in tests; [`HttpTransport`] is the production implementation.

pub mod config;
pub mod kv;
pub mod transport;

pub use config::Config;
pub use kv::{
    DeleteOptions, FoundPolicy, GetOptions, GetResult, Kv, NotFoundPolicy, PutOptions,
    Transformation,
};
pub use transport::{HttpTransport, Response, Transport, TransportError};
