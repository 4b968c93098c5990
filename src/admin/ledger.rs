//! Multisig transaction ledger
//!
//! Gates arbitrary component calls behind quorum approval from a fixed
//! administrator board. Each transaction is individually tracked through
//! propose -> confirm -> execute and is never deleted.

use crate::admin::board::{AdminBoard, BoardError};
use crate::admin::relay::{CallRelay, RelayError};
use crate::admin::transaction::{AdminTransaction, CallRequest};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised by ledger operations, one per violated precondition
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Board error: {0}")]
    Board(#[from] BoardError),
    #[error("Not an administrator: {0}")]
    NotAdministrator(String),
    #[error("Invalid target: target address must not be empty")]
    InvalidTarget,
    #[error("Unknown transaction: {0}")]
    UnknownTransaction(u64),
    #[error("Transaction {0} already executed")]
    AlreadyExecuted(u64),
    #[error("Transaction {tx_id} already confirmed by {administrator}")]
    AlreadyConfirmed { tx_id: u64, administrator: String },
    #[error("Quorum not met: have {have} confirmations, need {need}")]
    QuorumNotMet { have: u32, need: u8 },
    #[error("Relayed call failed: {0}")]
    CallFailed(#[from] RelayError),
}

/// Quorum-gated transaction ledger for a fixed administrator board
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminLedger {
    /// The fixed administrator set and quorum
    board: AdminBoard,
    /// All transactions, indexed by id
    transactions: Vec<AdminTransaction>,
    /// Confirmation set keyed by (transaction id, administrator)
    confirmations: HashSet<(u64, String)>,
}

impl AdminLedger {
    /// Create a ledger for the given administrator set and quorum
    pub fn new(administrators: Vec<String>, required: u8) -> Result<Self, AdminError> {
        let board = AdminBoard::new(administrators, required)?;
        Ok(Self::with_board(board))
    }

    /// Create a ledger for an existing board
    pub fn with_board(board: AdminBoard) -> Self {
        Self {
            board,
            transactions: Vec::new(),
            confirmations: HashSet::new(),
        }
    }

    /// Get the administrator board
    pub fn board(&self) -> &AdminBoard {
        &self.board
    }

    /// Propose a new call to a target component
    ///
    /// The submitter does not implicitly confirm; they must call
    /// [`confirm_transaction`](Self::confirm_transaction) separately.
    pub fn submit_transaction(
        &mut self,
        caller: &str,
        target: &str,
        value: u128,
        data: Vec<u8>,
    ) -> Result<u64, AdminError> {
        self.require_administrator(caller)?;

        if target.is_empty() {
            return Err(AdminError::InvalidTarget);
        }

        let id = self.transactions.len() as u64;
        let call = CallRequest::new(target, value, data);
        self.transactions
            .push(AdminTransaction::new(id, call, caller.to_string()));

        log::info!("Transaction {} submitted by {} -> {}", id, caller, target);
        Ok(id)
    }

    /// Record one administrator's confirmation of a pending transaction
    pub fn confirm_transaction(&mut self, caller: &str, tx_id: u64) -> Result<(), AdminError> {
        self.require_administrator(caller)?;

        let tx = self
            .transactions
            .get_mut(tx_id as usize)
            .ok_or(AdminError::UnknownTransaction(tx_id))?;

        if tx.executed {
            return Err(AdminError::AlreadyExecuted(tx_id));
        }

        let key = (tx_id, caller.to_string());
        if self.confirmations.contains(&key) {
            return Err(AdminError::AlreadyConfirmed {
                tx_id,
                administrator: caller.to_string(),
            });
        }

        self.confirmations.insert(key);
        tx.num_confirmations += 1;

        Ok(())
    }

    /// Relay a transaction's call once quorum is reached
    ///
    /// Any administrator may execute, not only the submitter. If the
    /// relayed call fails the executed flag is rolled back, so the
    /// transaction can be executed again once the target is fixed.
    pub fn execute_transaction<R: CallRelay>(
        &mut self,
        caller: &str,
        tx_id: u64,
        relay: &mut R,
    ) -> Result<(), AdminError> {
        self.require_administrator(caller)?;

        let required = self.board.required();
        let board_address = self.board.address.clone();

        let tx = self
            .transactions
            .get_mut(tx_id as usize)
            .ok_or(AdminError::UnknownTransaction(tx_id))?;

        if tx.executed {
            return Err(AdminError::AlreadyExecuted(tx_id));
        }

        if tx.num_confirmations < required as u32 {
            return Err(AdminError::QuorumNotMet {
                have: tx.num_confirmations,
                need: required,
            });
        }

        tx.executed = true;
        if let Err(e) = relay.relay(&board_address, &tx.call) {
            // Roll back so a fixed target can be retried
            tx.executed = false;
            return Err(AdminError::CallFailed(e));
        }
        tx.executed_at = Some(Utc::now());

        log::info!("Transaction {} executed by {}", tx_id, caller);
        Ok(())
    }

    /// Read-only accessor for a transaction record
    pub fn transaction(&self, tx_id: u64) -> Result<&AdminTransaction, AdminError> {
        self.transactions
            .get(tx_id as usize)
            .ok_or(AdminError::UnknownTransaction(tx_id))
    }

    /// Check whether an administrator has confirmed a transaction
    pub fn has_confirmed(&self, tx_id: u64, administrator: &str) -> bool {
        self.confirmations
            .contains(&(tx_id, administrator.to_string()))
    }

    /// Get total transaction count
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// List all transactions
    pub fn list_transactions(&self) -> &[AdminTransaction] {
        &self.transactions
    }

    /// List transactions still awaiting execution
    pub fn pending_transactions(&self) -> Vec<&AdminTransaction> {
        self.transactions.iter().filter(|t| !t.executed).collect()
    }

    fn require_administrator(&self, caller: &str) -> Result<(), AdminError> {
        if !self.board.is_administrator(caller) {
            return Err(AdminError::NotAdministrator(caller.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Relay stub recording calls, optionally failing every relay
    #[derive(Default)]
    struct ScriptedRelay {
        fail: bool,
        calls: Vec<(String, CallRequest)>,
    }

    impl CallRelay for ScriptedRelay {
        fn relay(&mut self, caller: &str, call: &CallRequest) -> Result<(), RelayError> {
            if self.fail {
                return Err(RelayError::TargetError("scripted failure".to_string()));
            }
            self.calls.push((caller.to_string(), call.clone()));
            Ok(())
        }
    }

    fn two_of_three() -> AdminLedger {
        AdminLedger::new(
            vec![
                "alice".to_string(),
                "bob".to_string(),
                "david".to_string(),
            ],
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_submit_assigns_sequential_ids() {
        let mut ledger = two_of_three();

        let id0 = ledger
            .submit_transaction("alice", "0xtoken", 0, vec![1])
            .unwrap();
        let id1 = ledger
            .submit_transaction("bob", "0xstake", 0, vec![2])
            .unwrap();

        assert_eq!(id0, 0);
        assert_eq!(id1, 1);
        assert_eq!(ledger.transaction_count(), 2);

        // No implicit confirmation by the submitter
        let tx = ledger.transaction(0).unwrap();
        assert_eq!(tx.num_confirmations, 0);
        assert!(!ledger.has_confirmed(0, "alice"));
    }

    #[test]
    fn test_submit_rejects_non_administrator() {
        let mut ledger = two_of_three();
        let result = ledger.submit_transaction("mallory", "0xtoken", 0, vec![]);
        assert!(matches!(result, Err(AdminError::NotAdministrator(_))));
    }

    #[test]
    fn test_submit_rejects_empty_target() {
        let mut ledger = two_of_three();
        let result = ledger.submit_transaction("alice", "", 0, vec![]);
        assert!(matches!(result, Err(AdminError::InvalidTarget)));
    }

    #[test]
    fn test_confirmation_counting() {
        let mut ledger = two_of_three();
        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();

        ledger.confirm_transaction("alice", 0).unwrap();
        assert_eq!(ledger.transaction(0).unwrap().num_confirmations, 1);

        ledger.confirm_transaction("bob", 0).unwrap();
        assert_eq!(ledger.transaction(0).unwrap().num_confirmations, 2);
        assert!(ledger.has_confirmed(0, "alice"));
        assert!(ledger.has_confirmed(0, "bob"));
        assert!(!ledger.has_confirmed(0, "david"));
    }

    #[test]
    fn test_double_confirmation_rejected() {
        let mut ledger = two_of_three();
        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();

        ledger.confirm_transaction("alice", 0).unwrap();
        let result = ledger.confirm_transaction("alice", 0);
        assert!(matches!(result, Err(AdminError::AlreadyConfirmed { .. })));

        // Count unchanged
        assert_eq!(ledger.transaction(0).unwrap().num_confirmations, 1);
    }

    #[test]
    fn test_confirm_unknown_transaction() {
        let mut ledger = two_of_three();
        let result = ledger.confirm_transaction("alice", 7);
        assert!(matches!(result, Err(AdminError::UnknownTransaction(7))));
    }

    #[test]
    fn test_confirm_rejects_non_administrator() {
        let mut ledger = two_of_three();
        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();
        let result = ledger.confirm_transaction("mallory", 0);
        assert!(matches!(result, Err(AdminError::NotAdministrator(_))));
    }

    #[test]
    fn test_execute_requires_quorum() {
        let mut ledger = two_of_three();
        let mut relay = ScriptedRelay::default();

        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();
        ledger.confirm_transaction("alice", 0).unwrap();

        let result = ledger.execute_transaction("alice", 0, &mut relay);
        assert!(matches!(
            result,
            Err(AdminError::QuorumNotMet { have: 1, need: 2 })
        ));
        assert!(!ledger.transaction(0).unwrap().executed);
        assert!(relay.calls.is_empty());
    }

    #[test]
    fn test_execute_relays_with_board_caller() {
        let mut ledger = two_of_three();
        let mut relay = ScriptedRelay::default();

        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![9, 9])
            .unwrap();
        ledger.confirm_transaction("alice", 0).unwrap();
        ledger.confirm_transaction("bob", 0).unwrap();

        // A different administrator than the submitter may execute
        ledger.execute_transaction("david", 0, &mut relay).unwrap();

        let tx = ledger.transaction(0).unwrap();
        assert!(tx.executed);
        assert!(tx.executed_at.is_some());

        assert_eq!(relay.calls.len(), 1);
        let (caller, call) = &relay.calls[0];
        assert_eq!(caller, ledger.board().address());
        assert_eq!(call.target, "0xtoken");
        assert_eq!(call.data, vec![9, 9]);
    }

    #[test]
    fn test_execute_twice_rejected() {
        let mut ledger = two_of_three();
        let mut relay = ScriptedRelay::default();

        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();
        ledger.confirm_transaction("alice", 0).unwrap();
        ledger.confirm_transaction("bob", 0).unwrap();
        ledger.execute_transaction("alice", 0, &mut relay).unwrap();

        let result = ledger.execute_transaction("bob", 0, &mut relay);
        assert!(matches!(result, Err(AdminError::AlreadyExecuted(0))));
        assert_eq!(relay.calls.len(), 1);
    }

    #[test]
    fn test_execute_rejects_non_administrator() {
        let mut ledger = two_of_three();
        let mut relay = ScriptedRelay::default();
        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();
        let result = ledger.execute_transaction("mallory", 0, &mut relay);
        assert!(matches!(result, Err(AdminError::NotAdministrator(_))));
    }

    #[test]
    fn test_failed_relay_rolls_back_and_is_retryable() {
        let mut ledger = two_of_three();
        let mut relay = ScriptedRelay {
            fail: true,
            ..Default::default()
        };

        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();
        ledger.confirm_transaction("alice", 0).unwrap();
        ledger.confirm_transaction("bob", 0).unwrap();

        let result = ledger.execute_transaction("alice", 0, &mut relay);
        assert!(matches!(result, Err(AdminError::CallFailed(_))));
        assert!(!ledger.transaction(0).unwrap().executed);

        // Once the target is fixed, execution succeeds
        relay.fail = false;
        ledger.execute_transaction("alice", 0, &mut relay).unwrap();
        assert!(ledger.transaction(0).unwrap().executed);
    }

    #[test]
    fn test_confirmations_never_exceed_board_size() {
        let mut ledger = two_of_three();
        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();

        for admin in ["alice", "bob", "david"] {
            ledger.confirm_transaction(admin, 0).unwrap();
        }
        for admin in ["alice", "bob", "david"] {
            assert!(ledger.confirm_transaction(admin, 0).is_err());
        }

        let count = ledger.transaction(0).unwrap().num_confirmations;
        assert_eq!(count as usize, ledger.board().administrator_count());
    }

    #[test]
    fn test_confirm_after_execute_rejected() {
        let mut ledger = two_of_three();
        let mut relay = ScriptedRelay::default();

        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();
        ledger.confirm_transaction("alice", 0).unwrap();
        ledger.confirm_transaction("bob", 0).unwrap();
        ledger.execute_transaction("alice", 0, &mut relay).unwrap();

        let result = ledger.confirm_transaction("david", 0);
        assert!(matches!(result, Err(AdminError::AlreadyExecuted(0))));
    }

    #[test]
    fn test_pending_transactions() {
        let mut ledger = two_of_three();
        let mut relay = ScriptedRelay::default();

        ledger
            .submit_transaction("alice", "0xtoken", 0, vec![])
            .unwrap();
        ledger
            .submit_transaction("alice", "0xstake", 0, vec![])
            .unwrap();
        ledger.confirm_transaction("alice", 0).unwrap();
        ledger.confirm_transaction("bob", 0).unwrap();
        ledger.execute_transaction("alice", 0, &mut relay).unwrap();

        let pending = ledger.pending_transactions();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, 1);
    }
}
