//! # Mock Coprocessor
//!
//! A deterministic, transparent backend. Plaintexts are kept in an
//! in-memory map keyed by handle.
//!
//! - Computed handles are SHA-256 over the operator tag and its operands,
//!   so the same operation over the same operands always yields the same
//!   handle.
//! - Input ciphertext digests are SHA-256 over the value and a per-store
//!   counter, so two encryptions of the same value differ. The handle is
//!   then derived from the digest and the binding with
//!   `InputCiphertext::derive`, exactly as a verifier recomputes it.
//!
//! Clones share one store. `snapshot`/`from_store` move the store in and
//! out of a serializable form for persistence.
//!
//! ## Security Notice
//!
//! Provides NO confidentiality. Anyone holding the store reads every value.

use std::collections::BTreeMap;
use std::sync::Arc;

use ecs_core::{ChainId, CiphertextHandle, FheType, Sha256Accumulator, COMPUTED_INDEX};
use ecs_proof::{InputBinding, InputCiphertext};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, ConfidentialBackend, Decryptor, InputEncryptor, Plaintext};

/// Serializable contents of a mock coprocessor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockStore {
    values: BTreeMap<CiphertextHandle, Plaintext>,
    inputs: u64,
}

impl MockStore {
    /// Number of stored ciphertexts.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// In-memory transparent backend.
#[derive(Debug, Clone)]
pub struct MockBackend {
    chain_id: ChainId,
    store: Arc<RwLock<MockStore>>,
}

impl MockBackend {
    /// Empty backend minting handles for `chain_id`.
    pub fn new(chain_id: ChainId) -> Self {
        Self::from_store(chain_id, MockStore::default())
    }

    /// Backend resumed from a snapshot.
    pub fn from_store(chain_id: ChainId, store: MockStore) -> Self {
        Self {
            chain_id,
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Copy of the current store.
    pub fn snapshot(&self) -> MockStore {
        self.store.read().clone()
    }

    /// The chain computed handles are minted under.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    fn computed(&self, op: &str, parts: &[&[u8]], fhe_type: FheType) -> CiphertextHandle {
        let mut acc = Sha256Accumulator::new();
        acc.update(b"ecs.mock.op:").update(op.as_bytes());
        for part in parts {
            acc.update(part);
        }
        CiphertextHandle::compose(&acc.finalize(), COMPUTED_INDEX, self.chain_id, fhe_type)
    }

    fn put(&self, handle: CiphertextHandle, value: Plaintext) -> CiphertextHandle {
        self.store.write().values.insert(handle, value);
        handle
    }

    fn get(&self, handle: &CiphertextHandle) -> Result<Plaintext, BackendError> {
        self.store
            .read()
            .values
            .get(handle)
            .copied()
            .ok_or_else(|| BackendError::UnknownHandle(handle.short()))
    }

    fn get_u32(&self, handle: &CiphertextHandle) -> Result<u32, BackendError> {
        match self.get(handle)? {
            Plaintext::Uint32(v) => Ok(v),
            other => Err(BackendError::TypeMismatch {
                expected: FheType::Uint32,
                found: other.fhe_type(),
            }),
        }
    }

    fn binary<F>(
        &self,
        op: &str,
        a: &CiphertextHandle,
        b: &CiphertextHandle,
        f: F,
    ) -> Result<CiphertextHandle, BackendError>
    where
        F: FnOnce(u32, u32) -> Plaintext,
    {
        let value = f(self.get_u32(a)?, self.get_u32(b)?);
        let handle = self.computed(op, &[a.as_bytes(), b.as_bytes()], value.fhe_type());
        Ok(self.put(handle, value))
    }
}

impl ConfidentialBackend for MockBackend {
    fn trivial_encrypt(&self, value: Plaintext) -> Result<CiphertextHandle, BackendError> {
        let handle = self.computed(
            "trivial",
            &[&[value.fhe_type().tag()], &value.as_u64().to_be_bytes()],
            value.fhe_type(),
        );
        Ok(self.put(handle, value))
    }

    fn add(
        &self,
        a: &CiphertextHandle,
        b: &CiphertextHandle,
    ) -> Result<CiphertextHandle, BackendError> {
        self.binary("add", a, b, |x, y| Plaintext::Uint32(x.saturating_add(y)))
    }

    fn sub(
        &self,
        a: &CiphertextHandle,
        b: &CiphertextHandle,
    ) -> Result<CiphertextHandle, BackendError> {
        self.binary("sub", a, b, |x, y| Plaintext::Uint32(x.saturating_sub(y)))
    }

    fn scale(
        &self,
        a: &CiphertextHandle,
        numerator: u32,
        denominator: u32,
    ) -> Result<CiphertextHandle, BackendError> {
        if denominator == 0 {
            return Err(BackendError::DivisionByZero);
        }
        let x = self.get_u32(a)?;
        let wide = u64::from(x) * u64::from(numerator) / u64::from(denominator);
        let value = Plaintext::Uint32(u32::try_from(wide).unwrap_or(u32::MAX));
        let handle = self.computed(
            "scale",
            &[a.as_bytes(), &numerator.to_be_bytes(), &denominator.to_be_bytes()],
            FheType::Uint32,
        );
        Ok(self.put(handle, value))
    }

    fn min(&self, a: &CiphertextHandle, cap: u32) -> Result<CiphertextHandle, BackendError> {
        let value = Plaintext::Uint32(self.get_u32(a)?.min(cap));
        let handle = self.computed("min", &[a.as_bytes(), &cap.to_be_bytes()], FheType::Uint32);
        Ok(self.put(handle, value))
    }

    fn ge(
        &self,
        a: &CiphertextHandle,
        b: &CiphertextHandle,
    ) -> Result<CiphertextHandle, BackendError> {
        self.binary("ge", a, b, |x, y| Plaintext::Bool(x >= y))
    }
}

impl InputEncryptor for MockBackend {
    fn encrypt_input(
        &self,
        value: Plaintext,
        index: u8,
        binding: &InputBinding,
    ) -> Result<InputCiphertext, BackendError> {
        let mut store = self.store.write();
        store.inputs += 1;
        let mut acc = Sha256Accumulator::new();
        acc.update(b"ecs.mock.ciphertext:")
            .update(&[value.fhe_type().tag()])
            .update(&value.as_u64().to_be_bytes())
            .update(&store.inputs.to_be_bytes());
        let input = InputCiphertext::derive(acc.finalize(), index, value.fhe_type(), binding);
        store.values.insert(input.handle, value);
        Ok(input)
    }
}

impl Decryptor for MockBackend {
    fn decrypt(&self, handle: &CiphertextHandle) -> Result<Plaintext, BackendError> {
        self.get(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecs_core::Address;
    use proptest::prelude::*;

    fn backend() -> MockBackend {
        MockBackend::new(ChainId::LOCAL)
    }

    fn constant(b: &MockBackend, v: u32) -> CiphertextHandle {
        b.trivial_encrypt(Plaintext::Uint32(v)).unwrap()
    }

    #[test]
    fn test_add_saturates() {
        let b = backend();
        let h = b.add(&constant(&b, u32::MAX), &constant(&b, 5)).unwrap();
        assert_eq!(b.decrypt(&h).unwrap(), Plaintext::Uint32(u32::MAX));
    }

    #[test]
    fn test_sub_saturates_at_zero() {
        let b = backend();
        let h = b.sub(&constant(&b, 10), &constant(&b, 130)).unwrap();
        assert_eq!(b.decrypt(&h).unwrap(), Plaintext::Uint32(0));
    }

    #[test]
    fn test_scale_truncates() {
        let b = backend();
        let h = b.scale(&constant(&b, 72), 5, 10).unwrap();
        assert_eq!(b.decrypt(&h).unwrap(), Plaintext::Uint32(36));
        let h = b.scale(&constant(&b, 29), 1, 10).unwrap();
        assert_eq!(b.decrypt(&h).unwrap(), Plaintext::Uint32(2));
    }

    #[test]
    fn test_scale_by_zero_rejected() {
        let b = backend();
        assert_eq!(
            b.scale(&constant(&b, 1), 1, 0).unwrap_err(),
            BackendError::DivisionByZero
        );
    }

    #[test]
    fn test_ge_yields_bool() {
        let b = backend();
        let h = b.ge(&constant(&b, 80), &constant(&b, 50)).unwrap();
        assert_eq!(h.fhe_type(), Some(FheType::Bool));
        assert_eq!(b.decrypt(&h).unwrap(), Plaintext::Bool(true));
    }

    #[test]
    fn test_bool_operand_rejected() {
        let b = backend();
        let flag = b.trivial_encrypt(Plaintext::Bool(true)).unwrap();
        let err = b.add(&flag, &constant(&b, 1)).unwrap_err();
        assert!(matches!(err, BackendError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let b = backend();
        let other = backend();
        let h = constant(&other, 3);
        assert!(matches!(
            b.min(&h, 1).unwrap_err(),
            BackendError::UnknownHandle(_)
        ));
    }

    #[test]
    fn test_computed_handles_are_deterministic() {
        let b = backend();
        let x = constant(&b, 7);
        let y = constant(&b, 9);
        assert_eq!(b.add(&x, &y).unwrap(), b.add(&x, &y).unwrap());
        assert_ne!(b.add(&x, &y).unwrap(), b.add(&y, &x).unwrap());
        assert!(b.add(&x, &y).unwrap().is_computed());
    }

    #[test]
    fn test_inputs_carry_index_and_differ() {
        let b = backend();
        let binding = InputBinding {
            user: Address::from_label("alice"),
            contract: Address::from_label("score"),
            chain_id: ChainId::LOCAL,
        };
        let first = b.encrypt_input(Plaintext::Uint32(30), 1, &binding).unwrap();
        let second = b.encrypt_input(Plaintext::Uint32(30), 1, &binding).unwrap();
        assert_ne!(first.handle, second.handle);
        assert_eq!(first.handle.index(), 1);
        assert!(!first.handle.is_computed());
        assert!(first.is_bound_to(1, &binding));
        assert_eq!(b.decrypt(&first.handle).unwrap(), Plaintext::Uint32(30));
    }

    #[test]
    fn test_snapshot_restores_values() {
        let b = backend();
        let h = constant(&b, 42);
        let json = serde_json::to_string(&b.snapshot()).unwrap();
        let store: MockStore = serde_json::from_str(&json).unwrap();
        let resumed = MockBackend::from_store(ChainId::LOCAL, store);
        assert_eq!(resumed.decrypt(&h).unwrap(), Plaintext::Uint32(42));
    }

    #[test]
    fn test_clones_share_store() {
        let b = backend();
        let c = b.clone();
        let h = constant(&c, 11);
        assert_eq!(b.decrypt(&h).unwrap(), Plaintext::Uint32(11));
    }

    proptest! {
        #[test]
        fn prop_scale_matches_wide_division(x in any::<u32>(), n in 0u32..1000, d in 1u32..1000) {
            let b = backend();
            let h = b.scale(&constant(&b, x), n, d).unwrap();
            let expected = (u64::from(x) * u64::from(n) / u64::from(d)).min(u64::from(u32::MAX));
            prop_assert_eq!(b.decrypt(&h).unwrap().as_u64(), expected);
        }
    }
}
