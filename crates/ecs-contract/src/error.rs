//! # Contract Errors
//!
//! Every variant aborts the call; nothing is committed. Messages carry
//! addresses, chain ids and short handle prefixes, never plaintext.

use ecs_core::{Address, ChainId, ProtocolError};
use ecs_fhe::EngineError;
use ecs_proof::VerifyError;
use ecs_state::LedgerError;
use thiserror::Error;

/// Errors surfaced by `EncryptedCreditScore`.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// An encrypted input failed verification or has the wrong type.
    #[error("invalid input proof: {0}")]
    InvalidProof(String),

    /// The host network does not provide the confidential protocol.
    #[error("confidential protocol unsupported on {chain_id}")]
    ProtocolUnsupported {
        /// The rejected chain.
        chain_id: ChainId,
    },

    /// The account has never submitted.
    #[error("no credit record for {account}")]
    NoRecord {
        /// The queried account.
        account: Address,
    },

    /// The caller may not perform this operation.
    #[error("{caller} is not authorized")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// Internal arithmetic or permission failure.
    #[error("engine: {0}")]
    Engine(#[from] EngineError),
}

impl From<VerifyError> for ScoreError {
    fn from(err: VerifyError) -> Self {
        Self::InvalidProof(err.to_string())
    }
}

impl From<ProtocolError> for ScoreError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Unsupported { chain_id } => Self::ProtocolUnsupported { chain_id },
        }
    }
}

impl From<LedgerError> for ScoreError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NoRecord { account } => Self::NoRecord { account },
        }
    }
}

impl ScoreError {
    /// Stable kind name for logs and the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidProof(_) => "InvalidProof",
            Self::ProtocolUnsupported { .. } => "ZamaProtocolUnsupported",
            Self::NoRecord { .. } => "NoRecord",
            Self::Unauthorized { .. } => "Unauthorized",
            Self::Engine(_) => "Engine",
        }
    }
}
