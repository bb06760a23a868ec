//! # ecs-acl — Ciphertext Permission Manager
//!
//! Records which principals may later obtain plaintext for which ciphertext
//! handle. The relation `(handle, principal)` only grows: there is no
//! revoke operation, and a value that must become private again gets a new
//! handle with its own grants.
//!
//! ## Transactions
//!
//! Grants made while a transaction runs are staged in an
//! [`AclTransaction`]. Persistent grants reach the [`Acl`] only through
//! [`Acl::apply`] once the whole transaction succeeds; transient grants
//! exist only inside the transaction and let the contract compute over
//! freshly ingested inputs and intermediates.

pub mod acl;
pub mod error;
pub mod transaction;

pub use acl::Acl;
pub use error::AclError;
pub use transaction::{AclDelta, AclTransaction};
