//! # Arithmetic Engine
//!
//! The only path by which contract code computes. The engine owns the
//! transaction's [`AclTransaction`] and acts for one computation context
//! (the contract address):
//!
//! - every operand must be allowed for the context, otherwise `NotAllowed`
//! - every result is granted to the context, transiently, before return
//! - verified inputs enter through [`ArithmeticEngine::admit`]; constants
//!   through [`ArithmeticEngine::as_euint32`]
//!
//! Values that must outlive the transaction are granted persistently with
//! [`ArithmeticEngine::allow`].

use ecs_acl::{AclDelta, AclError, AclTransaction};
use ecs_core::{Address, CiphertextHandle, CoreError, Ebool, Euint32};
use ecs_proof::VerifiedInput;
use thiserror::Error;

use crate::backend::{BackendError, ConfidentialBackend, Plaintext};

/// Errors from the arithmetic engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An operand is not usable by the computation context.
    #[error(transparent)]
    Acl(#[from] AclError),

    /// The backend rejected the operation.
    #[error("backend: {0}")]
    Backend(#[from] BackendError),

    /// A handle has the wrong encrypted type.
    #[error("handle: {0}")]
    Handle(#[from] CoreError),

    /// Scaling by a zero denominator.
    #[error("scalar division by zero")]
    DivisionByZero,
}

/// Backend plus ACL staging for one transaction.
pub struct ArithmeticEngine<'a, B: ConfidentialBackend + ?Sized> {
    backend: &'a B,
    acl: AclTransaction<'a>,
    context: Address,
}

impl<'a, B: ConfidentialBackend + ?Sized> ArithmeticEngine<'a, B> {
    /// Engine computing on behalf of `context`.
    pub fn new(backend: &'a B, acl: AclTransaction<'a>, context: Address) -> Self {
        Self {
            backend,
            acl,
            context,
        }
    }

    /// The computation context.
    pub fn context(&self) -> Address {
        self.context
    }

    /// Admit a proof-checked 32-bit input.
    pub fn admit(&mut self, input: &VerifiedInput) -> Result<Euint32, EngineError> {
        let handle = input.handle();
        let value = Euint32::try_from_handle(handle)?;
        self.acl.allow_transient(handle, self.context)?;
        tracing::debug!(handle = %handle.short(), "input admitted");
        Ok(value)
    }

    /// Trivially encrypt a public constant.
    pub fn as_euint32(&mut self, value: u32) -> Result<Euint32, EngineError> {
        let handle = self.backend.trivial_encrypt(Plaintext::Uint32(value))?;
        self.register_u32(handle)
    }

    /// `a + b`, saturating.
    pub fn add(&mut self, a: &Euint32, b: &Euint32) -> Result<Euint32, EngineError> {
        self.require(a.handle())?;
        self.require(b.handle())?;
        let handle = self.backend.add(a.handle(), b.handle())?;
        self.register_u32(handle)
    }

    /// `a - b`, saturating at zero.
    pub fn sub(&mut self, a: &Euint32, b: &Euint32) -> Result<Euint32, EngineError> {
        self.require(a.handle())?;
        self.require(b.handle())?;
        let handle = self.backend.sub(a.handle(), b.handle())?;
        self.register_u32(handle)
    }

    /// `floor(a * numerator / denominator)`.
    pub fn scalar_multiply(
        &mut self,
        a: &Euint32,
        numerator: u32,
        denominator: u32,
    ) -> Result<Euint32, EngineError> {
        if denominator == 0 {
            return Err(EngineError::DivisionByZero);
        }
        self.require(a.handle())?;
        let handle = self.backend.scale(a.handle(), numerator, denominator)?;
        self.register_u32(handle)
    }

    /// At most `cap`.
    pub fn clamp_min(&mut self, a: &Euint32, cap: u32) -> Result<Euint32, EngineError> {
        self.require(a.handle())?;
        let handle = self.backend.min(a.handle(), cap)?;
        self.register_u32(handle)
    }

    /// `a >= b`.
    pub fn greater_or_equal(&mut self, a: &Euint32, b: &Euint32) -> Result<Ebool, EngineError> {
        self.require(a.handle())?;
        self.require(b.handle())?;
        let handle = self.backend.ge(a.handle(), b.handle())?;
        let result = Ebool::try_from_handle(handle)?;
        self.acl.allow_transient(handle, self.context)?;
        Ok(result)
    }

    /// Stage a persistent grant.
    pub fn allow(
        &mut self,
        handle: impl Into<CiphertextHandle>,
        principal: Address,
    ) -> Result<(), EngineError> {
        self.acl.allow(handle.into(), principal)?;
        Ok(())
    }

    /// Whether `principal` may use `handle` within this transaction.
    pub fn is_allowed(&self, handle: &CiphertextHandle, principal: &Address) -> bool {
        self.acl.is_allowed(handle, principal)
    }

    /// End the transaction, keeping staged persistent grants.
    pub fn into_delta(self) -> AclDelta {
        self.acl.into_delta()
    }

    fn require(&self, handle: &CiphertextHandle) -> Result<(), EngineError> {
        self.acl.require_allowed(handle, &self.context)?;
        Ok(())
    }

    fn register_u32(&mut self, handle: CiphertextHandle) -> Result<Euint32, EngineError> {
        let result = Euint32::try_from_handle(handle)?;
        self.acl.allow_transient(handle, self.context)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Decryptor, InputEncryptor};
    use crate::mock::MockBackend;
    use ecs_acl::Acl;
    use ecs_core::ChainId;
    use ecs_crypto::Ed25519KeyPair;
    use ecs_proof::{InputAttester, InputBinding, InputVerifier, SignerSetVerifier};

    fn contract() -> Address {
        Address::from_label("score")
    }

    fn verified(backend: &MockBackend, value: Plaintext) -> VerifiedInput {
        let binding = InputBinding {
            user: Address::from_label("alice"),
            contract: contract(),
            chain_id: ChainId::LOCAL,
        };
        let attester = InputAttester::new(vec![Ed25519KeyPair::from_seed(&[7u8; 32])]);
        let verifier = SignerSetVerifier::new(attester.public_keys(), 1).unwrap();
        let encrypted = backend.encrypt_input(value, 0, &binding).unwrap();
        let proof = attester.attest(&[encrypted], &binding).unwrap();
        verifier
            .verify_input(&encrypted.handle, &proof, &binding)
            .unwrap()
    }

    fn input(backend: &MockBackend, value: u32) -> VerifiedInput {
        verified(backend, Plaintext::Uint32(value))
    }

    #[test]
    fn test_results_are_usable_in_same_transaction() {
        let backend = MockBackend::new(ChainId::LOCAL);
        let acl = Acl::new();
        let mut engine = ArithmeticEngine::new(&backend, acl.begin(), contract());
        let income = engine.admit(&input(&backend, 50_000)).unwrap();
        let scaled = engine.scalar_multiply(&income, 1, 500).unwrap();
        let capped = engine.clamp_min(&scaled, 100).unwrap();
        let threshold = engine.as_euint32(50).unwrap();
        let ok = engine.greater_or_equal(&capped, &threshold).unwrap();
        assert_eq!(backend.decrypt(ok.handle()).unwrap(), Plaintext::Bool(true));
        assert_eq!(backend.decrypt(capped.handle()).unwrap(), Plaintext::Uint32(100));
    }

    #[test]
    fn test_unadmitted_operand_rejected() {
        let backend = MockBackend::new(ChainId::LOCAL);
        let acl = Acl::new();
        let forged = Euint32::try_from_handle(input(&backend, 1).handle()).unwrap();
        let mut engine = ArithmeticEngine::new(&backend, acl.begin(), contract());
        let one = engine.as_euint32(1).unwrap();
        let err = engine.add(&forged, &one).unwrap_err();
        assert!(matches!(err, EngineError::Acl(AclError::NotAllowed { .. })));
    }

    #[test]
    fn test_zero_denominator_rejected_before_backend() {
        let backend = MockBackend::new(ChainId::LOCAL);
        let acl = Acl::new();
        let mut engine = ArithmeticEngine::new(&backend, acl.begin(), contract());
        let x = engine.as_euint32(10).unwrap();
        assert!(matches!(
            engine.scalar_multiply(&x, 1, 0).unwrap_err(),
            EngineError::DivisionByZero
        ));
    }

    #[test]
    fn test_transient_grants_dropped_persistent_kept() {
        let backend = MockBackend::new(ChainId::LOCAL);
        let mut acl = Acl::new();
        let alice = Address::from_label("alice");
        let (kept, scratch, delta) = {
            let mut engine = ArithmeticEngine::new(&backend, acl.begin(), contract());
            let a = engine.as_euint32(3).unwrap();
            let b = engine.as_euint32(4).unwrap();
            let sum = engine.add(&a, &b).unwrap();
            engine.allow(sum, contract()).unwrap();
            engine.allow(sum, alice).unwrap();
            (sum, a, engine.into_delta())
        };
        acl.apply(delta);
        assert!(acl.is_allowed(kept.handle(), &alice));
        assert!(acl.is_allowed(kept.handle(), &contract()));
        assert!(!acl.is_allowed(scratch.handle(), &contract()));
    }

    #[test]
    fn test_bool_input_not_admitted_as_uint() {
        let backend = MockBackend::new(ChainId::LOCAL);
        let acl = Acl::new();
        let flag = verified(&backend, Plaintext::Bool(true));
        let mut engine = ArithmeticEngine::new(&backend, acl.begin(), contract());
        let err = engine.admit(&flag).unwrap_err();
        assert!(matches!(err, EngineError::Handle(_)));
    }
}
