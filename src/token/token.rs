//! Fungible token ledger
//!
//! Balance/allowance accounting used for the reward and payment tokens.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::token::UNIT;

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: u128, need: u128 },
    #[error("Invalid amount: amount must be greater than 0")]
    InvalidAmount,
}

/// A fungible token ledger
///
/// Amounts are base units; one whole token is [`UNIT`] base units.
/// Minting is open, matching the faucet-style tokens the platform is
/// paid and rewarded in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Token {
    /// Token name (e.g. "Reward Token")
    pub name: String,
    /// Token symbol (e.g. "MEWA")
    pub symbol: String,
    /// Unique token address
    pub address: String,
    /// Balances: holder -> base units
    balances: HashMap<String, u128>,
    /// Allowances: owner -> (spender -> base units)
    allowances: HashMap<String, HashMap<String, u128>>,
    /// Total base units in circulation
    total_supply: u128,
}

impl Token {
    /// Create a new empty token ledger
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, address: String) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            address,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
        }
    }

    /// Get balance of an address in base units
    pub fn balance_of(&self, address: &str) -> u128 {
        *self.balances.get(address).unwrap_or(&0)
    }

    /// Get total supply in base units
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Get allowance for a spender in base units
    pub fn allowance(&self, owner: &str, spender: &str) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Mint whole tokens to an address
    pub fn mint(&mut self, to: &str, whole_tokens: u128) -> Result<(), TokenError> {
        if whole_tokens == 0 {
            return Err(TokenError::InvalidAmount);
        }
        let amount = whole_tokens * UNIT;
        *self.balances.entry(to.to_string()).or_insert(0) += amount;
        self.total_supply += amount;
        Ok(())
    }

    /// Transfer base units from one address to another
    pub fn transfer(&mut self, from: &str, to: &str, amount: u128) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::InvalidAmount);
        }

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        *self.balances.entry(from.to_string()).or_insert(0) -= amount;
        *self.balances.entry(to.to_string()).or_insert(0) += amount;
        Ok(())
    }

    /// Approve a spender to transfer base units on behalf of owner
    ///
    /// Setting `amount` to 0 revokes the allowance.
    pub fn approve(&mut self, owner: &str, spender: &str, amount: u128) {
        self.allowances
            .entry(owner.to_string())
            .or_default()
            .insert(spender.to_string(), amount);
    }

    /// Transfer base units on behalf of owner (requires prior approval)
    pub fn transfer_from(
        &mut self,
        spender: &str,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::InvalidAmount);
        }

        let current_allowance = self.allowance(from, spender);
        if current_allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                have: current_allowance,
                need: amount,
            });
        }

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        *self.balances.entry(from.to_string()).or_insert(0) -= amount;
        *self.balances.entry(to.to_string()).or_insert(0) += amount;

        if let Some(spenders) = self.allowances.get_mut(from) {
            if let Some(allowance) = spenders.get_mut(spender) {
                *allowance -= amount;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_token() -> Token {
        let mut token = Token::new("Reward Token", "MEWA", "0xMEWA".to_string());
        token.mint("creator", 100).unwrap();
        token
    }

    #[test]
    fn test_mint_scales_to_base_units() {
        let token = create_test_token();
        assert_eq!(token.balance_of("creator"), 100 * UNIT);
        assert_eq!(token.total_supply(), 100 * UNIT);
    }

    #[test]
    fn test_transfer() {
        let mut token = create_test_token();

        token.transfer("creator", "recipient", 10 * UNIT).unwrap();
        assert_eq!(token.balance_of("creator"), 90 * UNIT);
        assert_eq!(token.balance_of("recipient"), 10 * UNIT);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut token = create_test_token();

        let result = token.transfer("creator", "recipient", 200 * UNIT);
        assert!(matches!(
            result,
            Err(TokenError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_transfer_zero_amount() {
        let mut token = create_test_token();

        let result = token.transfer("creator", "recipient", 0);
        assert!(matches!(result, Err(TokenError::InvalidAmount)));
    }

    #[test]
    fn test_approve_and_transfer_from() {
        let mut token = create_test_token();

        token.approve("creator", "spender", 50 * UNIT);
        assert_eq!(token.allowance("creator", "spender"), 50 * UNIT);

        token
            .transfer_from("spender", "creator", "recipient", 20 * UNIT)
            .unwrap();

        assert_eq!(token.balance_of("creator"), 80 * UNIT);
        assert_eq!(token.balance_of("recipient"), 20 * UNIT);
        assert_eq!(token.allowance("creator", "spender"), 30 * UNIT);
    }

    #[test]
    fn test_transfer_from_insufficient_allowance() {
        let mut token = create_test_token();

        token.approve("creator", "spender", 5 * UNIT);

        let result = token.transfer_from("spender", "creator", "recipient", 10 * UNIT);
        assert!(matches!(
            result,
            Err(TokenError::InsufficientAllowance { .. })
        ));
    }
}
