//! Contribution point (CP) token
//!
//! A non-transferable point ledger administered by the board. Points are
//! minted against a signed permit from a whitelisted signer and burned by
//! whitelisted operators; holders can never transfer them.

use crate::crypto::{public_key_from_hex, public_key_to_address, tagged_digest, verify_signature};
use crate::token::UNIT;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Signing domain tag for mint permits
const PERMIT_TAG: &str = "loyalty/mint-permit/v1";

/// Contribution token errors
#[derive(Error, Debug)]
pub enum CpError {
    #[error("Signature is expired")]
    SignatureExpired,
    #[error("Signature already used")]
    SignatureUsed,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Not in whitelist: {0}")]
    NotWhitelisted(String),
    #[error("CP token is non-transferable")]
    TransferDisabled,
    #[error("Caller is not the administrator board: {0}")]
    NotAdmin(String),
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Key error: {0}")]
    Key(#[from] crate::crypto::KeyError),
}

/// A signed authorization to mint contribution points
///
/// The permit is signed off-platform by a whitelisted signer; the nonce
/// and the signature-replay set together prevent reuse.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MintPermit {
    /// Account receiving the points
    pub requester: String,
    /// Whole points to mint
    pub amount: u128,
    /// Epoch-second deadline; the permit is dead once `now >= deadline`
    pub deadline: u64,
    /// Caller-chosen nonce, bound into the digest
    pub nonce: u64,
}

impl MintPermit {
    /// Compute the digest a signer commits to
    pub fn digest(&self) -> Vec<u8> {
        let encoded = format!(
            "{}:{}:{}:{}",
            self.requester, self.amount, self.deadline, self.nonce
        );
        tagged_digest(PERMIT_TAG, encoded.as_bytes())
    }
}

/// Non-transferable contribution point ledger
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContributionToken {
    /// Token name (e.g. "Contribution Point")
    pub name: String,
    /// Token symbol (e.g. "CP")
    pub symbol: String,
    /// Unique token address
    pub address: String,
    /// Administrator board address; sole authority over the whitelist
    admin: String,
    /// Balances: holder -> base units
    balances: HashMap<String, u128>,
    /// Addresses allowed to sign permits and burn points
    whitelist: HashSet<String>,
    /// Hex-encoded signatures already consumed by a mint
    used_signatures: HashSet<String>,
}

impl ContributionToken {
    /// Create a new contribution token administered by `admin`
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        address: String,
        admin: String,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            address,
            admin,
            balances: HashMap::new(),
            whitelist: HashSet::new(),
            used_signatures: HashSet::new(),
        }
    }

    /// Get balance of an address in base units
    pub fn balance_of(&self, address: &str) -> u128 {
        *self.balances.get(address).unwrap_or(&0)
    }

    /// Check whitelist membership
    pub fn is_whitelisted(&self, address: &str) -> bool {
        self.whitelist.contains(address)
    }

    /// Add accounts to the whitelist
    ///
    /// Only reachable through the administrator board (the caller must be
    /// the board address, i.e. the call arrived via the multisig relay).
    pub fn add_to_whitelist(&mut self, caller: &str, accounts: &[String]) -> Result<(), CpError> {
        if caller != self.admin {
            return Err(CpError::NotAdmin(caller.to_string()));
        }
        for account in accounts {
            self.whitelist.insert(account.clone());
        }
        log::info!("{} account(s) whitelisted on {}", accounts.len(), self.symbol);
        Ok(())
    }

    /// Mint points against a signed permit
    ///
    /// Verifies the signature over the permit digest against
    /// `signer_pubkey_hex`, requires the signer's address to be
    /// whitelisted, and rejects expired or replayed permits. Credits
    /// `permit.amount` whole points.
    pub fn mint(
        &mut self,
        permit: &MintPermit,
        signature: &[u8],
        signer_pubkey_hex: &str,
        now: u64,
    ) -> Result<(), CpError> {
        if now >= permit.deadline {
            return Err(CpError::SignatureExpired);
        }

        let sig_hex = hex::encode(signature);
        if self.used_signatures.contains(&sig_hex) {
            return Err(CpError::SignatureUsed);
        }

        let signer = public_key_from_hex(signer_pubkey_hex)?;
        if !verify_signature(&signer, &permit.digest(), signature)? {
            return Err(CpError::InvalidSignature);
        }

        let signer_address = public_key_to_address(&signer);
        if !self.whitelist.contains(&signer_address) {
            return Err(CpError::NotWhitelisted(signer_address));
        }

        self.used_signatures.insert(sig_hex);
        *self
            .balances
            .entry(permit.requester.clone())
            .or_insert(0) += permit.amount * UNIT;

        Ok(())
    }

    /// Burn base units from a holder
    ///
    /// The caller must be whitelisted; holders cannot burn their own
    /// points directly.
    pub fn burn(&mut self, caller: &str, from: &str, amount: u128) -> Result<(), CpError> {
        if !self.whitelist.contains(caller) {
            return Err(CpError::NotWhitelisted(caller.to_string()));
        }

        let balance = self.balance_of(from);
        if balance < amount {
            return Err(CpError::InsufficientBalance {
                have: balance,
                need: amount,
            });
        }

        *self.balances.entry(from.to_string()).or_insert(0) -= amount;
        Ok(())
    }

    /// Transfers are permanently disabled
    pub fn transfer(&mut self, _from: &str, _to: &str, _amount: u128) -> Result<(), CpError> {
        Err(CpError::TransferDisabled)
    }

    /// Delegated transfers are permanently disabled
    pub fn transfer_from(
        &mut self,
        _spender: &str,
        _from: &str,
        _to: &str,
        _amount: u128,
    ) -> Result<(), CpError> {
        Err(CpError::TransferDisabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    const BOARD: &str = "3BoardAddress";

    fn create_test_token() -> (ContributionToken, KeyPair) {
        let mut cp = ContributionToken::new(
            "Contribution Point",
            "CP",
            "0xCP".to_string(),
            BOARD.to_string(),
        );
        let signer = KeyPair::generate();
        cp.add_to_whitelist(BOARD, &[signer.address()]).unwrap();
        (cp, signer)
    }

    fn sample_permit(requester: &str) -> MintPermit {
        MintPermit {
            requester: requester.to_string(),
            amount: 20,
            deadline: 1_000,
            nonce: 15,
        }
    }

    #[test]
    fn test_mint_with_valid_permit() {
        let (mut cp, signer) = create_test_token();
        let permit = sample_permit("owner");
        let signature = signer.sign(&permit.digest()).unwrap();

        cp.mint(&permit, &signature, &signer.public_key_hex(), 500)
            .unwrap();
        assert_eq!(cp.balance_of("owner"), 20 * UNIT);
    }

    #[test]
    fn test_replayed_signature_rejected() {
        let (mut cp, signer) = create_test_token();
        let permit = sample_permit("owner");
        let signature = signer.sign(&permit.digest()).unwrap();

        cp.mint(&permit, &signature, &signer.public_key_hex(), 500)
            .unwrap();
        let result = cp.mint(&permit, &signature, &signer.public_key_hex(), 500);
        assert!(matches!(result, Err(CpError::SignatureUsed)));
        assert_eq!(cp.balance_of("owner"), 20 * UNIT);
    }

    #[test]
    fn test_expired_permit_rejected() {
        let (mut cp, signer) = create_test_token();
        let permit = sample_permit("owner");
        let signature = signer.sign(&permit.digest()).unwrap();

        // Dead exactly at the deadline
        let result = cp.mint(&permit, &signature, &signer.public_key_hex(), 1_000);
        assert!(matches!(result, Err(CpError::SignatureExpired)));
    }

    #[test]
    fn test_tampered_permit_rejected() {
        let (mut cp, signer) = create_test_token();
        let permit = sample_permit("owner");
        let signature = signer.sign(&permit.digest()).unwrap();

        let mut tampered = permit.clone();
        tampered.amount = 1_000_000;
        let result = cp.mint(&tampered, &signature, &signer.public_key_hex(), 500);
        assert!(matches!(result, Err(CpError::InvalidSignature)));
        assert_eq!(cp.balance_of("owner"), 0);
    }

    #[test]
    fn test_non_whitelisted_signer_rejected() {
        let (mut cp, _) = create_test_token();
        let outsider = KeyPair::generate();
        let permit = sample_permit("owner");
        let signature = outsider.sign(&permit.digest()).unwrap();

        let result = cp.mint(&permit, &signature, &outsider.public_key_hex(), 500);
        assert!(matches!(result, Err(CpError::NotWhitelisted(_))));
    }

    #[test]
    fn test_transfers_disabled() {
        let (mut cp, _) = create_test_token();
        assert!(matches!(
            cp.transfer("owner", "addr1", 10 * UNIT),
            Err(CpError::TransferDisabled)
        ));
        assert!(matches!(
            cp.transfer_from("spender", "owner", "addr1", 10 * UNIT),
            Err(CpError::TransferDisabled)
        ));
    }

    #[test]
    fn test_burn_requires_whitelist() {
        let (mut cp, signer) = create_test_token();
        let permit = sample_permit("owner");
        let signature = signer.sign(&permit.digest()).unwrap();
        cp.mint(&permit, &signature, &signer.public_key_hex(), 500)
            .unwrap();

        let result = cp.burn("addr2", "owner", 10 * UNIT);
        assert!(matches!(result, Err(CpError::NotWhitelisted(_))));

        // Whitelisted burner succeeds
        cp.burn(&signer.address(), "owner", 10 * UNIT).unwrap();
        assert_eq!(cp.balance_of("owner"), 10 * UNIT);
    }

    #[test]
    fn test_whitelist_is_board_gated() {
        let (mut cp, _) = create_test_token();
        let result = cp.add_to_whitelist("mallory", &["mallory".to_string()]);
        assert!(matches!(result, Err(CpError::NotAdmin(_))));
    }
}
