//! # ecs-proof — Input Proof Verification
//!
//! Encrypted inputs arrive as `(handle, proof)` pairs produced off-chain.
//! Before the engine touches a handle, the proof verifier checks that the
//! proof binds exactly this handle to exactly this submitter, contract
//! instance and chain.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): `InputVerifier` is the seam the contract
//!   depends on; `InputBinding` is the `(submitter, contract, chain)` triple.
//!
//! - **Proof** (`proof.rs`): `InputProof` attests a batch of input handles,
//!   each paired with its ciphertext digest, with one or more attester
//!   signatures over a canonical transcript. `InputCiphertext::derive` ties
//!   a handle to its ciphertext, batch index and binding.
//!
//! - **Verifier** (`verifier.rs`): `SignerSetVerifier` accepts a proof when
//!   at least `threshold` distinct trusted attesters signed it.
//!
//! - **Attester** (`attester.rs`): the signing side, used by the client-side
//!   input builder and by tests.

pub mod attester;
pub mod proof;
pub mod traits;
pub mod verifier;

pub use attester::InputAttester;
pub use proof::{Attestation, InputCiphertext, InputProof, MAX_BATCH};
pub use traits::{InputBinding, InputVerifier, VerifiedInput, VerifyError};
pub use verifier::{SignerSetError, SignerSetVerifier};
