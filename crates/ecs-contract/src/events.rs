//! Contract event log. Events carry addresses and handles only.

use ecs_core::{Address, ChainId, Euint32, ProtocolId, Timestamp};
use serde::{Deserialize, Serialize};

/// A committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ContractEvent {
    /// The instance was constructed.
    Deployed {
        /// Instance address.
        contract: Address,
        /// Deployer.
        owner: Address,
        /// Host network.
        chain_id: ChainId,
        /// Targeted protocol deployment.
        protocol_id: ProtocolId,
        /// Whether the internal default threshold was used.
        default_threshold: bool,
    },
    /// The threshold was replaced.
    ThresholdUpdated {
        /// Caller.
        by: Address,
        /// The new threshold handle.
        threshold: Euint32,
    },
    /// An account record was written.
    CreditDataSubmitted {
        /// Submitting account.
        account: Address,
        /// Whether this created the record.
        first_submission: bool,
    },
}

/// A timestamped event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Commit time.
    pub at: Timestamp,
    /// The event.
    #[serde(flatten)]
    pub event: ContractEvent,
}

impl EventRecord {
    pub(crate) fn now(event: ContractEvent) -> Self {
        Self {
            at: Timestamp::now(),
            event,
        }
    }
}
