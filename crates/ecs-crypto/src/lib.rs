//! # ecs-crypto — Cryptographic Primitives
//!
//! Ed25519 keys and signatures for input attestations. An input attester
//! (the off-chain coprocessor that accepts a client's ciphertexts) signs a
//! canonical transcript binding the ciphertext handles to a submitter, a
//! contract instance and a chain. The proof verifier checks those
//! signatures against its trusted attester set.
//!
//! ## Crate Policy
//!
//! - Depends only on `ecs-core` internally.
//! - Signing and verification accept `&CanonicalBytes` only.
//! - Private keys are never serialized or logged.

pub mod ed25519;

pub use ed25519::{verify, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
