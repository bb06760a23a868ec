//! Shared harness: one contract on the local chain, a mock coprocessor,
//! and a single trusted attester.

#![allow(dead_code)]

use ecs_contract::{
    ContractConfig, DecryptionRelay, EncryptedCreditScore, EncryptedInput, EncryptedInputBuilder,
    RelayError, ScoreError,
};
use ecs_core::{Address, ChainId, CiphertextHandle};
use ecs_crypto::Ed25519KeyPair;
use ecs_fhe::{Decryptor, MockBackend, Plaintext};
use ecs_proof::{InputAttester, InputBinding, SignerSetVerifier};
use ecs_state::{AccountTransition, ThresholdInit};

pub type Contract = EncryptedCreditScore<MockBackend, SignerSetVerifier>;

pub struct Harness {
    pub contract: Contract,
    pub backend: MockBackend,
    pub attester: InputAttester,
    pub deployer: Address,
}

pub fn attester() -> InputAttester {
    InputAttester::new(vec![
        Ed25519KeyPair::from_seed(&[0xa1; 32]),
        Ed25519KeyPair::from_seed(&[0xa2; 32]),
    ])
}

impl Harness {
    pub fn deploy() -> Self {
        let deployer = Address::from_label("deployer");
        let config = ContractConfig::new(deployer, ChainId::LOCAL);
        let attester = attester();
        let verifier = SignerSetVerifier::new(attester.public_keys(), 2).unwrap();
        let backend = MockBackend::new(ChainId::LOCAL);
        let contract = EncryptedCreditScore::deploy(
            config,
            ThresholdInit::DefaultInternal,
            backend.clone(),
            verifier,
        )
        .unwrap();
        Self {
            contract,
            backend,
            attester,
            deployer,
        }
    }

    pub fn binding(&self, user: Address) -> InputBinding {
        InputBinding {
            user,
            contract: self.contract.address(),
            chain_id: self.contract.chain_id(),
        }
    }

    pub fn encrypt(&self, user: Address, values: &[u32]) -> Vec<EncryptedInput> {
        let mut builder = EncryptedInputBuilder::new(&self.backend, &self.attester, self.binding(user));
        for v in values {
            builder = builder.add32(*v);
        }
        let batch = builder.encrypt().unwrap();
        (0..values.len()).map(|i| batch.input(i).unwrap()).collect()
    }

    pub fn submit(
        &mut self,
        user: Address,
        income: u32,
        debt_ratio: u32,
        repayment: u32,
    ) -> Result<AccountTransition, ScoreError> {
        let inputs = self.encrypt(user, &[income, debt_ratio, repayment]);
        self.contract
            .submit_credit_data(user, &inputs[0], &inputs[1], &inputs[2])
    }

    pub fn set_threshold(&mut self, caller: Address, value: u32) -> Result<(), ScoreError> {
        let input = self.encrypt(caller, &[value]).remove(0);
        self.contract.set_threshold(caller, input.handle, &input.proof)
    }

    pub fn plain(&self, handle: impl Into<CiphertextHandle>) -> u64 {
        self.backend.decrypt(&handle.into()).unwrap().as_u64()
    }

    pub fn user_decrypt(
        &self,
        handle: impl Into<CiphertextHandle>,
        requester: Address,
    ) -> Result<Plaintext, RelayError> {
        DecryptionRelay::new(&self.backend, self.contract.acl(), self.contract.address())
            .user_decrypt(handle, requester)
    }
}

pub fn alice() -> Address {
    Address::from_label("alice")
}

pub fn bob() -> Address {
    Address::from_label("bob")
}
