//! # EncryptedCreditScore
//!
//! ## Transaction shape
//!
//! Every state-changing call follows the same order:
//!
//! 1. authorize the caller
//! 2. verify every encrypted input against `(caller, contract, chain)`
//! 3. compute through an `ArithmeticEngine` over a staged ACL transaction
//! 4. stage persistent grants for every value that will be stored
//! 5. commit: apply the ACL delta, write ledger or threshold, log the event
//!
//! Steps 1 to 4 touch no committed state, so any error before step 5
//! leaves the contract exactly as it was. Step 5 cannot fail.

use ecs_acl::Acl;
use ecs_core::{
    Address, ChainId, CiphertextHandle, Ebool, Euint32, FheType, ProtocolConfig, ProtocolId,
};
use ecs_fhe::{ArithmeticEngine, ConfidentialBackend};
use ecs_proof::{InputBinding, InputProof, InputVerifier, VerifiedInput};
use ecs_state::{AccountLedger, AccountRecord, AccountTransition, ThresholdInit, ThresholdStore};
use serde::{Deserialize, Serialize};

use crate::config::ContractConfig;
use crate::error::ScoreError;
use crate::events::{ContractEvent, EventRecord};
use crate::input::EncryptedInput;
use crate::scoring::{self, PriorScore};

/// Everything the contract persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractState {
    /// Instance parameters.
    pub config: ContractConfig,
    /// Committed grants.
    pub acl: Acl,
    /// Account records.
    pub ledger: AccountLedger,
    /// Threshold slot.
    pub threshold: ThresholdStore,
    /// Committed events, oldest first.
    pub events: Vec<EventRecord>,
}

/// A deployed credit score contract.
pub struct EncryptedCreditScore<B: ConfidentialBackend, V: InputVerifier> {
    state: ContractState,
    backend: B,
    verifier: V,
}

impl<B: ConfidentialBackend, V: InputVerifier> EncryptedCreditScore<B, V> {
    /// Construct a new instance.
    ///
    /// Fails with `ProtocolUnsupported` on a network without the
    /// confidential protocol, and with `InvalidProof` if an authenticated
    /// threshold does not verify for the deployer.
    pub fn deploy(
        config: ContractConfig,
        init: ThresholdInit,
        backend: B,
        verifier: V,
    ) -> Result<Self, ScoreError> {
        let protocol = ProtocolConfig::for_chain(config.chain_id).map_err(|e| {
            tracing::warn!(chain_id = %config.chain_id, "deployment rejected");
            ScoreError::from(e)
        })?;

        let default_threshold = init.is_default();
        let verified = match &init {
            ThresholdInit::Authenticated { handle, proof } => Some(verify_uint32(
                &verifier,
                handle,
                proof,
                &binding(&config, config.owner),
            )?),
            ThresholdInit::DefaultInternal => None,
        };

        let mut acl = Acl::new();
        let (threshold, delta) = {
            let mut engine = ArithmeticEngine::new(&backend, acl.begin(), config.address);
            let threshold = match verified {
                Some(input) => engine.admit(&input)?,
                None => engine.as_euint32(config.default_threshold)?,
            };
            engine.allow(threshold, config.address)?;
            engine.allow(threshold, config.owner)?;
            (threshold, engine.into_delta())
        };
        acl.apply(delta);

        let event = ContractEvent::Deployed {
            contract: config.address,
            owner: config.owner,
            chain_id: config.chain_id,
            protocol_id: protocol.protocol_id,
            default_threshold,
        };
        tracing::info!(
            contract = %config.address,
            owner = %config.owner,
            chain_id = %config.chain_id,
            default_threshold,
            "contract deployed"
        );

        Ok(Self {
            state: ContractState {
                config,
                acl,
                ledger: AccountLedger::new(),
                threshold: ThresholdStore::new(threshold),
                events: vec![EventRecord::now(event)],
            },
            backend,
            verifier,
        })
    }

    /// Resume an instance from persisted state.
    pub fn from_state(state: ContractState, backend: B, verifier: V) -> Self {
        Self {
            state,
            backend,
            verifier,
        }
    }

    /// Replace the threshold. Owner only.
    pub fn set_threshold(
        &mut self,
        caller: Address,
        handle: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<(), ScoreError> {
        self.try_set_threshold(caller, handle, proof)
            .map_err(|e| {
                tracing::warn!(%caller, kind = e.kind(), "threshold update rejected");
                e
            })
    }

    fn try_set_threshold(
        &mut self,
        caller: Address,
        handle: CiphertextHandle,
        proof: &InputProof,
    ) -> Result<(), ScoreError> {
        let config = self.state.config;
        if caller != config.owner {
            return Err(ScoreError::Unauthorized { caller });
        }
        let input = verify_uint32(&self.verifier, &handle, proof, &binding(&config, caller))?;

        let (threshold, delta) = {
            let mut engine =
                ArithmeticEngine::new(&self.backend, self.state.acl.begin(), config.address);
            let threshold = engine.admit(&input)?;
            engine.allow(threshold, config.address)?;
            engine.allow(threshold, config.owner)?;
            (threshold, engine.into_delta())
        };

        self.state.acl.apply(delta);
        self.state.threshold.replace(threshold);
        self.state
            .events
            .push(EventRecord::now(ContractEvent::ThresholdUpdated {
                by: caller,
                threshold,
            }));
        tracing::info!(
            %caller,
            revision = self.state.threshold.revision(),
            "threshold updated"
        );
        Ok(())
    }

    /// Score an encrypted submission and replace the caller's record.
    pub fn submit_credit_data(
        &mut self,
        caller: Address,
        income: &EncryptedInput,
        debt_ratio: &EncryptedInput,
        repayment_score: &EncryptedInput,
    ) -> Result<AccountTransition, ScoreError> {
        self.try_submit(caller, income, debt_ratio, repayment_score)
            .map_err(|e| {
                tracing::warn!(%caller, kind = e.kind(), "submission rejected");
                e
            })
    }

    fn try_submit(
        &mut self,
        caller: Address,
        income: &EncryptedInput,
        debt_ratio: &EncryptedInput,
        repayment_score: &EncryptedInput,
    ) -> Result<AccountTransition, ScoreError> {
        let config = self.state.config;
        let bound = binding(&config, caller);
        let income = verify_uint32(&self.verifier, &income.handle, &income.proof, &bound)?;
        let debt_ratio =
            verify_uint32(&self.verifier, &debt_ratio.handle, &debt_ratio.proof, &bound)?;
        let repayment_score = verify_uint32(
            &self.verifier,
            &repayment_score.handle,
            &repayment_score.proof,
            &bound,
        )?;

        let prior = match self.state.ledger.get(&caller) {
            Some(record) => PriorScore::OnFile(record.current_score),
            None => PriorScore::Baseline,
        };
        let threshold = self.state.threshold.current();

        let (record, delta) = {
            let mut engine =
                ArithmeticEngine::new(&self.backend, self.state.acl.begin(), config.address);
            let income = engine.admit(&income)?;
            let debt_ratio = engine.admit(&debt_ratio)?;
            engine.admit(&repayment_score)?;

            let outcome = scoring::evaluate(&mut engine, prior, &income, &debt_ratio, &threshold)?;
            for principal in [config.address, caller] {
                engine.allow(outcome.prior, principal)?;
                engine.allow(outcome.score, principal)?;
                engine.allow(outcome.qualified, principal)?;
            }
            let record = AccountRecord::new(outcome.prior, outcome.score, outcome.qualified);
            (record, engine.into_delta())
        };

        self.state.acl.apply(delta);
        let transition = self.state.ledger.write(caller, record);
        self.state
            .events
            .push(EventRecord::now(ContractEvent::CreditDataSubmitted {
                account: caller,
                first_submission: transition.is_first(),
            }));
        tracing::info!(
            account = %caller,
            from = %transition.from,
            to = %transition.to,
            "credit data submitted"
        );
        Ok(transition)
    }

    /// Whether `user` has a record.
    pub fn has_credit_data(&self, user: &Address) -> bool {
        self.state.ledger.has_record(user)
    }

    /// Current score of `user`.
    pub fn get_credit_score(&self, user: &Address) -> Result<Euint32, ScoreError> {
        Ok(self.state.ledger.require(user)?.current_score)
    }

    /// Qualification flag of `user`.
    pub fn get_qualification_status(&self, user: &Address) -> Result<Ebool, ScoreError> {
        Ok(self.state.ledger.require(user)?.qualification)
    }

    /// Prior score used by the latest submission of `user`.
    pub fn get_last_score(&self, user: &Address) -> Result<Euint32, ScoreError> {
        Ok(self.state.ledger.require(user)?.last_score)
    }

    /// The current threshold.
    pub fn get_threshold(&self) -> Euint32 {
        self.state.threshold.current()
    }

    /// The confidential protocol deployment this instance targets.
    pub fn confidential_protocol_id(&self) -> Result<ProtocolId, ScoreError> {
        Ok(ProtocolConfig::for_chain(self.state.config.chain_id)?.protocol_id)
    }

    /// Instance address.
    pub fn address(&self) -> Address {
        self.state.config.address
    }

    /// Deployer.
    pub fn owner(&self) -> Address {
        self.state.config.owner
    }

    /// Host network.
    pub fn chain_id(&self) -> ChainId {
        self.state.config.chain_id
    }

    /// Committed grants.
    pub fn acl(&self) -> &Acl {
        &self.state.acl
    }

    /// Committed events.
    pub fn events(&self) -> &[EventRecord] {
        &self.state.events
    }

    /// Persisted state.
    pub fn state(&self) -> &ContractState {
        &self.state
    }

    /// The arithmetic backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Split into state and collaborators.
    pub fn into_parts(self) -> (ContractState, B, V) {
        (self.state, self.backend, self.verifier)
    }
}

fn binding(config: &ContractConfig, user: Address) -> InputBinding {
    InputBinding {
        user,
        contract: config.address,
        chain_id: config.chain_id,
    }
}

fn verify_uint32<V: InputVerifier + ?Sized>(
    verifier: &V,
    handle: &CiphertextHandle,
    proof: &InputProof,
    binding: &InputBinding,
) -> Result<VerifiedInput, ScoreError> {
    let input = verifier.verify_input(handle, proof, binding)?;
    if input.fhe_type() != FheType::Uint32 {
        return Err(ScoreError::InvalidProof(format!(
            "{}: expected {}, found {}",
            handle.short(),
            FheType::Uint32,
            input.fhe_type()
        )));
    }
    Ok(input)
}
