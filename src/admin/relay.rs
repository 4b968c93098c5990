//! Call relay abstraction
//!
//! Separates the ledger's quorum logic from the invocation mechanism.
//! The platform implements [`CallRelay`] by dispatching on the target
//! address; tests implement it with scripted stubs.

use crate::admin::transaction::CallRequest;
use thiserror::Error;

/// Errors raised while relaying a call to its target
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Unknown call target: {0}")]
    UnknownTarget(String),
    #[error("Invalid call payload: {0}")]
    InvalidPayload(String),
    #[error("Target rejected call: {0}")]
    TargetError(String),
}

/// Performs a relayed call on behalf of the administrator board
///
/// `caller` is the board address; components gate privileged operations
/// on it. A relay must either fully apply the call or leave the target
/// unchanged and return an error.
pub trait CallRelay {
    fn relay(&mut self, caller: &str, call: &CallRequest) -> Result<(), RelayError>;
}
