//! Error types for Emissary
//!
//! This module defines all error types used throughout the client.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Decode and encode are deliberately absent: the codec recovers locally
//! from malformed stored data and never surfaces an error (see
//! `emissary_core::codec`).

use thiserror::Error;

/// Result type alias for Emissary operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store operations
#[derive(Debug, Error)]
pub enum Error {
    /// Read with Reject-on-absent hit a key that does not exist
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Read with Reject-on-present hit a key that already exists
    #[error("key already exists: {0}")]
    KeyAlreadyExists(String),

    /// The store answered with a status outside the expected 404/200 pair
    #[error("unknown store status: {status}")]
    UnknownStatus {
        /// The unexpected HTTP status
        status: u16,
    },

    /// A blocking wait exceeded its configured ceiling
    #[error("wait for change timed out")]
    WaitTimeout,

    /// A blocking wait was canceled before the store answered
    #[error("wait for change canceled")]
    WaitCanceled,

    /// The transport failed below the protocol level
    #[error("transport error: {0}")]
    Transport(String),

    /// The store's response body was not the expected JSON listing
    #[error("invalid response body: {0}")]
    InvalidResponse(String),
}
