//! # ecs-contract — Encrypted Credit Score
//!
//! The contract instance and everything needed to drive it locally.
//!
//! ## Architecture
//!
//! - **Contract** (`contract.rs`): `EncryptedCreditScore`, generic over the
//!   arithmetic backend and the input verifier. Every state-changing call
//!   verifies all inputs first, computes through an `ArithmeticEngine`,
//!   then commits ledger, threshold and ACL changes together.
//!
//! - **Scoring** (`scoring.rs`): the score pipeline over encrypted operands
//!   and its plaintext reference.
//!
//! - **Config** (`config.rs`), **Errors** (`error.rs`), **Events**
//!   (`events.rs`).
//!
//! - **Client side** (`input.rs`, `relay.rs`): the encrypted input builder
//!   and the decryption relay. Neither is used by the contract itself.
//!
//! ## Security Invariants
//!
//! - No plaintext of any scoring input or output is stored or logged.
//! - A failed call leaves ledger, threshold, ACL and event log unchanged.
//! - Every handle returned by a query is granted to the owning account and
//!   to the contract.

pub mod config;
pub mod contract;
pub mod error;
pub mod events;
pub mod input;
pub mod relay;
pub mod scoring;

pub use config::{ContractConfig, DEFAULT_THRESHOLD};
pub use contract::{ContractState, EncryptedCreditScore};
pub use error::ScoreError;
pub use events::{ContractEvent, EventRecord};
pub use input::{EncryptedBatch, EncryptedInput, EncryptedInputBuilder, InputError};
pub use relay::{DecryptionRelay, RelayError};
pub use scoring::{PriorScore, ScoreOutcome};
