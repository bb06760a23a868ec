//! # ecs-fhe — Confidential Arithmetic
//!
//! The contract computes over ciphertext handles only. Operator
//! implementations live behind [`ConfidentialBackend`], a deliberately
//! narrow trait covering exactly the operations the scoring pipeline uses.
//!
//! ## Components
//!
//! - **Backend** (`backend.rs`): the operator trait, plus the
//!   [`InputEncryptor`] and [`Decryptor`] capabilities used by clients and
//!   the decryption relay. The contract never holds a `Decryptor`.
//!
//! - **Mock** (`mock.rs`): a transparent in-memory coprocessor. Handles
//!   are derived deterministically; values are stored in the clear.
//!
//! - **Engine** (`engine.rs`): wraps a backend and an ACL transaction.
//!   Refuses operands the contract is not allowed to use and registers a
//!   transient grant on every result before returning it.
//!
//! ## Security Notice
//!
//! `MockBackend` provides NO confidentiality. It exists for local
//! simulation and tests.

pub mod backend;
pub mod engine;
pub mod mock;

pub use backend::{BackendError, ConfidentialBackend, Decryptor, InputEncryptor, Plaintext};
pub use engine::{ArithmeticEngine, EngineError};
pub use mock::{MockBackend, MockStore};
