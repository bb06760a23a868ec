//! The committed grant relation.

use std::collections::{BTreeMap, BTreeSet};

use ecs_core::{Address, CiphertextHandle};
use serde::{Deserialize, Serialize};

use crate::error::AclError;
use crate::transaction::{AclDelta, AclTransaction};

/// Append-only `(handle, principal)` relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    grants: BTreeMap<CiphertextHandle, BTreeSet<Address>>,
}

impl Acl {
    /// An empty relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `principal` may request decryption of `handle`.
    pub fn is_allowed(&self, handle: &CiphertextHandle, principal: &Address) -> bool {
        self.grants
            .get(handle)
            .is_some_and(|set| set.contains(principal))
    }

    /// Every principal granted on `handle`, in address order.
    pub fn principals(&self, handle: &CiphertextHandle) -> Vec<Address> {
        self.grants
            .get(handle)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of handles carrying at least one grant.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether no grant exists.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Grant directly, outside any transaction. Idempotent.
    pub fn allow(&mut self, handle: CiphertextHandle, principal: Address) -> Result<(), AclError> {
        check_handle(&handle)?;
        self.grants.entry(handle).or_default().insert(principal);
        Ok(())
    }

    /// Start staging grants against the current relation.
    pub fn begin(&self) -> AclTransaction<'_> {
        AclTransaction::new(self)
    }

    /// Apply the persistent grants of a committed transaction.
    pub fn apply(&mut self, delta: AclDelta) {
        let count = delta.len();
        for (handle, principal) in delta.into_grants() {
            self.grants.entry(handle).or_default().insert(principal);
        }
        tracing::debug!(grants = count, "acl delta applied");
    }
}

pub(crate) fn check_handle(handle: &CiphertextHandle) -> Result<(), AclError> {
    handle
        .validate()
        .map(|_| ())
        .map_err(|e| AclError::MalformedHandle(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecs_core::{ChainId, FheType, Sha256Accumulator};

    fn handle(tag: &[u8]) -> CiphertextHandle {
        let mut acc = Sha256Accumulator::new();
        acc.update(tag);
        CiphertextHandle::compose(&acc.finalize(), 0, ChainId::LOCAL, FheType::Uint32)
    }

    #[test]
    fn test_allow_is_idempotent() {
        let mut acl = Acl::new();
        let h = handle(b"a");
        let alice = Address::from_label("alice");
        acl.allow(h, alice).unwrap();
        acl.allow(h, alice).unwrap();
        assert!(acl.is_allowed(&h, &alice));
        assert_eq!(acl.principals(&h), vec![alice]);
    }

    #[test]
    fn test_unknown_handle_has_no_principals() {
        let acl = Acl::new();
        assert!(acl.principals(&handle(b"x")).is_empty());
        assert!(!acl.is_allowed(&handle(b"x"), &Address::from_label("alice")));
    }

    #[test]
    fn test_zero_handle_rejected() {
        let mut acl = Acl::new();
        let err = acl
            .allow(CiphertextHandle::ZERO, Address::from_label("alice"))
            .unwrap_err();
        assert!(matches!(err, AclError::MalformedHandle(_)));
        assert!(acl.is_empty());
    }

    #[test]
    fn test_serde_preserves_grants() {
        let mut acl = Acl::new();
        acl.allow(handle(b"a"), Address::from_label("alice")).unwrap();
        acl.allow(handle(b"a"), Address::from_label("score")).unwrap();
        let json = serde_json::to_string(&acl).unwrap();
        let back: Acl = serde_json::from_str(&json).unwrap();
        assert_eq!(back, acl);
    }
}
