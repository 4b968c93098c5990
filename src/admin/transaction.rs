//! Ledger transaction records
//!
//! A ledger transaction is a proposed call to an external component,
//! held until enough administrators confirm it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deferred invocation: target component, native value, opaque payload
///
/// The ledger never interprets `data`; it is forwarded verbatim to the
/// target through a [`CallRelay`](crate::admin::CallRelay) once quorum is
/// reached.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CallRequest {
    /// Address of the component to call
    pub target: String,
    /// Native-currency amount to forward
    pub value: u128,
    /// Encoded call payload
    pub data: Vec<u8>,
}

impl CallRequest {
    /// Create a new call request
    pub fn new(target: impl Into<String>, value: u128, data: Vec<u8>) -> Self {
        Self {
            target: target.into(),
            value,
            data,
        }
    }

    /// Hex-encoded payload, for display
    pub fn data_hex(&self) -> String {
        hex::encode(&self.data)
    }
}

/// One proposed call tracked through propose -> confirm -> execute
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminTransaction {
    /// Sequential id, assigned at submission (0-based)
    pub id: u64,
    /// The call to relay once quorum is reached
    pub call: CallRequest,
    /// Count of distinct administrators who have confirmed
    pub num_confirmations: u32,
    /// True once successfully relayed
    pub executed: bool,
    /// Administrator who submitted the transaction
    pub submitted_by: String,
    /// Submission timestamp
    pub submitted_at: DateTime<Utc>,
    /// Execution timestamp, if executed
    pub executed_at: Option<DateTime<Utc>>,
}

impl AdminTransaction {
    /// Create a new pending transaction with zero confirmations
    pub fn new(id: u64, call: CallRequest, submitted_by: String) -> Self {
        Self {
            id,
            call,
            num_confirmations: 0,
            executed: false,
            submitted_by,
            submitted_at: Utc::now(),
            executed_at: None,
        }
    }

    /// Target component address
    pub fn target(&self) -> &str {
        &self.call.target
    }

    /// Native value forwarded with the call
    pub fn value(&self) -> u128 {
        self.call.value
    }

    /// Opaque call payload
    pub fn data(&self) -> &[u8] {
        &self.call.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction_is_pending() {
        let call = CallRequest::new("0xtarget", 0, vec![1, 2, 3]);
        let tx = AdminTransaction::new(0, call, "alice".to_string());

        assert_eq!(tx.id, 0);
        assert_eq!(tx.num_confirmations, 0);
        assert!(!tx.executed);
        assert!(tx.executed_at.is_none());
        assert_eq!(tx.target(), "0xtarget");
        assert_eq!(tx.value(), 0);
        assert_eq!(tx.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_data_hex() {
        let call = CallRequest::new("0xtarget", 0, vec![0xde, 0xad]);
        assert_eq!(call.data_hex(), "dead");
    }
}
