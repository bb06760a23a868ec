//! # ecs-state — Account Ledger and Global Parameters
//!
//! Holds handles only. Nothing here touches the arithmetic backend or the
//! permission manager; the contract stages ledger writes and commits them
//! together with the ACL delta.
//!
//! - **Ledger** (`ledger.rs`): one `AccountRecord` per account, with the
//!   `NoRecord → HasRecord` state machine.
//! - **Threshold** (`threshold.rs`): the single encrypted threshold slot,
//!   and the tagged constructor input `ThresholdInit`.

pub mod ledger;
pub mod threshold;

pub use ledger::{AccountLedger, AccountRecord, AccountState, AccountTransition, LedgerError};
pub use threshold::{ThresholdInit, ThresholdInitError, ThresholdStore};
