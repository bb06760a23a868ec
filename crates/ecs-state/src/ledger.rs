//! # Account Ledger
//!
//! ## States
//!
//! ```text
//! NoRecord ──submit──▶ HasRecord ──submit──▶ HasRecord
//! ```
//!
//! `NoRecord` is the absence of an entry. `HasRecord` is entered by the
//! first committed submission and never left. Every later submission
//! replaces the record wholesale.

use std::collections::BTreeMap;

use ecs_core::{Address, Ebool, Euint32};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Encrypted scoring state of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Always `true` for a stored record.
    pub has_submitted: bool,
    /// Prior score used by the latest submission.
    pub last_score: Euint32,
    /// Score computed by the latest submission.
    pub current_score: Euint32,
    /// `current_score >= threshold` at the time of the latest submission.
    pub qualification: Ebool,
}

impl AccountRecord {
    /// A freshly computed record.
    pub fn new(last_score: Euint32, current_score: Euint32, qualification: Ebool) -> Self {
        Self {
            has_submitted: true,
            last_score,
            current_score,
            qualification,
        }
    }
}

/// Lifecycle state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountState {
    /// Never submitted.
    NoRecord,
    /// At least one committed submission.
    HasRecord,
}

impl std::fmt::Display for AccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NoRecord => "NO_RECORD",
            Self::HasRecord => "HAS_RECORD",
        })
    }
}

/// Outcome of a ledger write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTransition {
    /// The account written.
    pub account: Address,
    /// State before the write.
    pub from: AccountState,
    /// State after the write.
    pub to: AccountState,
}

impl AccountTransition {
    /// Whether this write created the record.
    pub fn is_first(&self) -> bool {
        self.from == AccountState::NoRecord
    }
}

/// Ledger errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The account has never submitted.
    #[error("no credit record for {account}")]
    NoRecord {
        /// The queried account.
        account: Address,
    },
}

/// All account records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedger {
    records: BTreeMap<Address, AccountRecord>,
}

impl AccountLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `account`.
    pub fn state(&self, account: &Address) -> AccountState {
        if self.records.contains_key(account) {
            AccountState::HasRecord
        } else {
            AccountState::NoRecord
        }
    }

    /// Whether `account` has a record.
    pub fn has_record(&self, account: &Address) -> bool {
        self.records.contains_key(account)
    }

    /// The record of `account`, if any.
    pub fn get(&self, account: &Address) -> Option<&AccountRecord> {
        self.records.get(account)
    }

    /// The record of `account`, or `NoRecord`.
    pub fn require(&self, account: &Address) -> Result<&AccountRecord, LedgerError> {
        self.records
            .get(account)
            .ok_or(LedgerError::NoRecord { account: *account })
    }

    /// Replace the record of `account`.
    pub fn write(&mut self, account: Address, record: AccountRecord) -> AccountTransition {
        let from = self.state(&account);
        self.records.insert(account, record);
        AccountTransition {
            account,
            from,
            to: AccountState::HasRecord,
        }
    }

    /// Number of accounts with a record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no account has submitted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Accounts in address order.
    pub fn accounts(&self) -> impl Iterator<Item = &Address> {
        self.records.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecs_core::{ChainId, CiphertextHandle, FheType, Sha256Accumulator, COMPUTED_INDEX};

    fn handle(tag: &str, ty: FheType) -> CiphertextHandle {
        let mut acc = Sha256Accumulator::new();
        acc.update(tag.as_bytes());
        CiphertextHandle::compose(&acc.finalize(), COMPUTED_INDEX, ChainId::LOCAL, ty)
    }

    fn record(tag: &str) -> AccountRecord {
        AccountRecord::new(
            Euint32::try_from_handle(handle(&format!("{tag}-last"), FheType::Uint32)).unwrap(),
            Euint32::try_from_handle(handle(&format!("{tag}-cur"), FheType::Uint32)).unwrap(),
            Ebool::try_from_handle(handle(&format!("{tag}-q"), FheType::Bool)).unwrap(),
        )
    }

    #[test]
    fn test_new_account_has_no_record() {
        let ledger = AccountLedger::new();
        let alice = Address::from_label("alice");
        assert_eq!(ledger.state(&alice), AccountState::NoRecord);
        assert!(!ledger.has_record(&alice));
        assert_eq!(
            ledger.require(&alice).unwrap_err(),
            LedgerError::NoRecord { account: alice }
        );
    }

    #[test]
    fn test_first_write_creates_record() {
        let mut ledger = AccountLedger::new();
        let alice = Address::from_label("alice");
        let t = ledger.write(alice, record("a"));
        assert!(t.is_first());
        assert_eq!(t.to, AccountState::HasRecord);
        assert!(ledger.require(&alice).unwrap().has_submitted);
    }

    #[test]
    fn test_second_write_replaces_wholesale() {
        let mut ledger = AccountLedger::new();
        let alice = Address::from_label("alice");
        ledger.write(alice, record("a"));
        let t = ledger.write(alice, record("b"));
        assert!(!t.is_first());
        assert_eq!(t.from, AccountState::HasRecord);
        assert_eq!(*ledger.require(&alice).unwrap(), record("b"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_accounts_are_independent() {
        let mut ledger = AccountLedger::new();
        ledger.write(Address::from_label("alice"), record("a"));
        assert!(!ledger.has_record(&Address::from_label("bob")));
        assert_eq!(ledger.accounts().count(), 1);
    }

    #[test]
    fn test_ledger_serialization() {
        let mut ledger = AccountLedger::new();
        ledger.write(Address::from_label("alice"), record("a"));
        let json = serde_json::to_string(&ledger).unwrap();
        let back: AccountLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(AccountState::NoRecord.to_string(), "NO_RECORD");
        assert_eq!(AccountState::HasRecord.to_string(), "HAS_RECORD");
    }
}
