//! # Error Types
//!
//! Shared error enums for the foundational layer. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//! Error messages never include plaintext values; handles and addresses
//! are the only identifying data they carry.

use thiserror::Error;

/// Errors raised while parsing or validating foundational types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A hex-encoded value could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// An address was not 20 bytes.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A ciphertext handle was malformed.
    #[error("invalid ciphertext handle: {0}")]
    InvalidHandle(String),

    /// A timestamp could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical transcripts.
    #[error("float values are not permitted in canonical transcripts: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key parsing failed.
    #[error("key error: {0}")]
    KeyError(String),
}
