//! # ecs-core — Foundational Types for the Encrypted Credit Score Engine
//!
//! Every other crate in the workspace depends on `ecs-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Opaque ciphertext handles.** `CiphertextHandle` is a 32-byte
//!    reference to an encrypted value. It carries type and chain metadata
//!    but never plaintext. The typed wrappers `Euint32` and `Ebool` keep
//!    encrypted integers and encrypted booleans from being confused.
//!
//! 2. **Newtype principals.** `Address` identifies accounts and contract
//!    instances. `ChainId` identifies the host network. No bare byte arrays
//!    or integers cross crate boundaries.
//!
//! 3. **`CanonicalBytes` for every signed transcript.** Input attestations
//!    are signed over JCS-canonical JSON, so the signer and the verifier can
//!    never disagree on the byte sequence.
//!
//! 4. **Explicit protocol table.** `ProtocolConfig::for_chain()` is the only
//!    place that decides whether a network supports confidential compute.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ecs-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod handle;
pub mod hex;
pub mod identity;
pub mod protocol;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{ContentDigest, Sha256Accumulator};
pub use error::{CanonicalizationError, CoreError, CryptoError};
pub use handle::{CiphertextHandle, Ebool, Euint32, FheType, COMPUTED_INDEX, HANDLE_VERSION};
pub use identity::{Address, ChainId};
pub use protocol::{ProtocolConfig, ProtocolError, ProtocolId};
pub use temporal::Timestamp;
