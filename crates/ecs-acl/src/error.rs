//! Permission errors.

use ecs_core::Address;
use thiserror::Error;

/// Errors from the permission manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AclError {
    /// The handle is empty or malformed and cannot carry grants.
    #[error("cannot grant on malformed handle: {0}")]
    MalformedHandle(String),

    /// The principal holds no grant on the handle.
    #[error("{principal} is not allowed to use {handle}")]
    NotAllowed {
        /// Short handle prefix.
        handle: String,
        /// The principal that was checked.
        principal: Address,
    },
}
