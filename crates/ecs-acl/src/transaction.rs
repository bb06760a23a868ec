//! # Staged Grants
//!
//! An `AclTransaction` reads through to the committed relation and records
//! new grants on the side. Dropping it discards everything; `into_delta`
//! keeps the persistent grants and drops the transient ones.

use std::collections::BTreeSet;

use ecs_core::{Address, CiphertextHandle};

use crate::acl::{check_handle, Acl};
use crate::error::AclError;

/// Grants staged by one transaction.
#[derive(Debug)]
pub struct AclTransaction<'a> {
    base: &'a Acl,
    persistent: BTreeSet<(CiphertextHandle, Address)>,
    transient: BTreeSet<(CiphertextHandle, Address)>,
}

/// Persistent grants ready to be applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclDelta {
    grants: BTreeSet<(CiphertextHandle, Address)>,
}

impl<'a> AclTransaction<'a> {
    pub(crate) fn new(base: &'a Acl) -> Self {
        Self {
            base,
            persistent: BTreeSet::new(),
            transient: BTreeSet::new(),
        }
    }

    /// Stage a persistent grant.
    pub fn allow(&mut self, handle: CiphertextHandle, principal: Address) -> Result<(), AclError> {
        check_handle(&handle)?;
        self.persistent.insert((handle, principal));
        Ok(())
    }

    /// Grant for the lifetime of this transaction only.
    pub fn allow_transient(
        &mut self,
        handle: CiphertextHandle,
        principal: Address,
    ) -> Result<(), AclError> {
        check_handle(&handle)?;
        self.transient.insert((handle, principal));
        Ok(())
    }

    /// Whether `principal` holds a committed, staged, or transient grant.
    pub fn is_allowed(&self, handle: &CiphertextHandle, principal: &Address) -> bool {
        let key = (*handle, *principal);
        self.transient.contains(&key)
            || self.persistent.contains(&key)
            || self.base.is_allowed(handle, principal)
    }

    /// Fail with `NotAllowed` unless `principal` may use `handle`.
    pub fn require_allowed(
        &self,
        handle: &CiphertextHandle,
        principal: &Address,
    ) -> Result<(), AclError> {
        if self.is_allowed(handle, principal) {
            Ok(())
        } else {
            Err(AclError::NotAllowed {
                handle: handle.short(),
                principal: *principal,
            })
        }
    }

    /// Finish the transaction, keeping persistent grants not yet committed.
    pub fn into_delta(self) -> AclDelta {
        let base = self.base;
        let grants = self
            .persistent
            .into_iter()
            .filter(|(h, p)| !base.is_allowed(h, p))
            .collect();
        AclDelta { grants }
    }
}

impl AclDelta {
    /// Number of new grants.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether the delta adds nothing.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub(crate) fn into_grants(self) -> impl Iterator<Item = (CiphertextHandle, Address)> {
        self.grants.into_iter()
    }
}
