//! # Error Types
//!
//! Error types shared across the workspace, derived with `thiserror`.
//! Canonicalization failures carry enough context to tell a rejected
//! input apart from a serializer fault; validation failures name the
//! offending field so callers can surface a correctable message.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Certificate fields are strings and integers; floats have
    /// non-deterministic JSON number encodings.
    #[error("float values are not permitted in canonical certificate content: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error validating caller-supplied input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required field was absent or empty.
    #[error("required field {field} is missing or empty")]
    EmptyField {
        /// Wire name of the missing field (e.g. `ownerId`).
        field: &'static str,
    },

    /// An identifier could not be parsed.
    #[error("invalid identifier {0:?}")]
    InvalidId(String),

    /// A digest string was not 64 lowercase hex characters.
    #[error("invalid digest {0:?}: expected 64 lowercase hex characters")]
    InvalidDigest(String),

    /// A timestamp string could not be parsed or was not UTC.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
