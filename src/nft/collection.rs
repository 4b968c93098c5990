//! NFT ownership ledger
//!
//! Sequentially-minted tokens with optional whitelist-gated transfers.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// NFT collection errors
#[derive(Error, Debug)]
pub enum NftError {
    #[error("Unknown token: {0}")]
    UnknownToken(u64),
    #[error("Not owner of token {token_id}: {caller}")]
    NotTokenOwner { token_id: u64, caller: String },
    #[error("Transfer not allowed for {0}")]
    TransferNotAllowed(String),
    #[error("Caller is not the collection owner: {0}")]
    NotOwner(String),
    #[error("Max supply reached: {0}")]
    MaxSupplyReached(u64),
}

/// An NFT ownership ledger with sequential ids
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NftCollection {
    /// Collection name
    pub name: String,
    /// Collection symbol
    pub symbol: String,
    /// Unique collection address
    pub address: String,
    /// Collection owner; gates whitelist changes
    owner: String,
    /// Token owners: token id -> holder
    owners: HashMap<u64, String>,
    /// Next token id to mint
    next_token_id: u64,
    /// When true, only whitelisted senders may transfer
    restricted: bool,
    /// Senders allowed to transfer when restricted
    whitelist: HashSet<String>,
    /// Optional cap on total minted
    max_supply: Option<u64>,
}

impl NftCollection {
    /// Create a new collection; `restricted` gates transfers behind the whitelist
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        address: String,
        owner: String,
        restricted: bool,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            address,
            owner,
            owners: HashMap::new(),
            next_token_id: 0,
            restricted,
            whitelist: HashSet::new(),
            max_supply: None,
        }
    }

    /// Set the max supply cap
    pub fn set_max_supply(&mut self, max_supply: u64) {
        self.max_supply = Some(max_supply);
    }

    /// Mint the next token to `to`, returning its id
    pub fn mint(&mut self, to: &str) -> Result<u64, NftError> {
        if let Some(max) = self.max_supply {
            if self.next_token_id >= max {
                return Err(NftError::MaxSupplyReached(max));
            }
        }

        let token_id = self.next_token_id;
        self.next_token_id += 1;
        self.owners.insert(token_id, to.to_string());
        Ok(token_id)
    }

    /// Get the owner of a token
    pub fn owner_of(&self, token_id: u64) -> Result<&str, NftError> {
        self.owners
            .get(&token_id)
            .map(String::as_str)
            .ok_or(NftError::UnknownToken(token_id))
    }

    /// Count tokens held by an address
    pub fn balance_of(&self, address: &str) -> usize {
        self.owners.values().filter(|o| *o == address).count()
    }

    /// Total tokens minted so far
    pub fn total_minted(&self) -> u64 {
        self.next_token_id
    }

    /// Transfer a token
    ///
    /// `caller` must be the current owner; when the collection is
    /// restricted the caller must also be whitelisted.
    pub fn transfer(
        &mut self,
        caller: &str,
        to: &str,
        token_id: u64,
    ) -> Result<(), NftError> {
        if self.restricted && !self.whitelist.contains(caller) {
            return Err(NftError::TransferNotAllowed(caller.to_string()));
        }

        let owner = self.owner_of(token_id)?;
        if owner != caller {
            return Err(NftError::NotTokenOwner {
                token_id,
                caller: caller.to_string(),
            });
        }

        self.owners.insert(token_id, to.to_string());
        Ok(())
    }

    /// Transfer a token on a holder's behalf
    ///
    /// `from` must own the token; when the collection is restricted the
    /// operator must be whitelisted. Used by escrow contracts that hold
    /// and return tokens.
    pub fn operator_transfer(
        &mut self,
        operator: &str,
        from: &str,
        to: &str,
        token_id: u64,
    ) -> Result<(), NftError> {
        if self.restricted && !self.whitelist.contains(operator) {
            return Err(NftError::TransferNotAllowed(operator.to_string()));
        }

        let owner = self.owner_of(token_id)?;
        if owner != from {
            return Err(NftError::NotTokenOwner {
                token_id,
                caller: from.to_string(),
            });
        }

        self.owners.insert(token_id, to.to_string());
        Ok(())
    }

    /// Add senders to the transfer whitelist; collection-owner gated
    pub fn add_to_whitelist(&mut self, caller: &str, accounts: &[String]) -> Result<(), NftError> {
        if caller != self.owner {
            return Err(NftError::NotOwner(caller.to_string()));
        }
        for account in accounts {
            self.whitelist.insert(account.clone());
        }
        Ok(())
    }

    /// Check transfer-whitelist membership
    pub fn is_whitelisted(&self, address: &str) -> bool {
        self.whitelist.contains(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_collection() -> NftCollection {
        NftCollection::new(
            "Simple NFT",
            "SNFT",
            "0xNFT".to_string(),
            "deployer".to_string(),
            false,
        )
    }

    fn restricted_collection() -> NftCollection {
        NftCollection::new(
            "Loyal NFT",
            "LNFT",
            "0xLNFT".to_string(),
            "deployer".to_string(),
            true,
        )
    }

    #[test]
    fn test_sequential_mint() {
        let mut nft = open_collection();

        assert_eq!(nft.mint("addr1").unwrap(), 0);
        assert_eq!(nft.mint("addr1").unwrap(), 1);
        assert_eq!(nft.mint("owner").unwrap(), 2);

        assert_eq!(nft.balance_of("addr1"), 2);
        assert_eq!(nft.total_minted(), 3);
        assert_eq!(nft.owner_of(0).unwrap(), "addr1");
    }

    #[test]
    fn test_max_supply() {
        let mut nft = open_collection();
        nft.set_max_supply(2);

        nft.mint("a").unwrap();
        nft.mint("a").unwrap();
        assert!(matches!(nft.mint("a"), Err(NftError::MaxSupplyReached(2))));
    }

    #[test]
    fn test_open_transfer() {
        let mut nft = open_collection();
        nft.mint("addr1").unwrap();

        nft.transfer("addr1", "owner", 0).unwrap();
        assert_eq!(nft.owner_of(0).unwrap(), "owner");
    }

    #[test]
    fn test_transfer_requires_ownership() {
        let mut nft = open_collection();
        nft.mint("addr1").unwrap();

        let result = nft.transfer("owner", "owner", 0);
        assert!(matches!(result, Err(NftError::NotTokenOwner { .. })));
    }

    #[test]
    fn test_unknown_token() {
        let nft = open_collection();
        assert!(matches!(nft.owner_of(5), Err(NftError::UnknownToken(5))));
    }

    #[test]
    fn test_restricted_transfer_needs_whitelist() {
        let mut nft = restricted_collection();
        nft.mint("addr1").unwrap();

        let result = nft.transfer("addr1", "owner", 0);
        assert!(matches!(result, Err(NftError::TransferNotAllowed(_))));

        nft.add_to_whitelist("deployer", &["addr1".to_string()])
            .unwrap();
        nft.transfer("addr1", "owner", 0).unwrap();
        assert_eq!(nft.owner_of(0).unwrap(), "owner");
    }

    #[test]
    fn test_operator_transfer() {
        let mut nft = restricted_collection();
        nft.mint("addr1").unwrap();

        // Operator not whitelisted on a restricted collection
        let result = nft.operator_transfer("0xSTAKE", "addr1", "0xSTAKE", 0);
        assert!(matches!(result, Err(NftError::TransferNotAllowed(_))));

        nft.add_to_whitelist("deployer", &["0xSTAKE".to_string()])
            .unwrap();

        // From must own the token
        let result = nft.operator_transfer("0xSTAKE", "addr2", "0xSTAKE", 0);
        assert!(matches!(result, Err(NftError::NotTokenOwner { .. })));

        nft.operator_transfer("0xSTAKE", "addr1", "0xSTAKE", 0).unwrap();
        assert_eq!(nft.owner_of(0).unwrap(), "0xSTAKE");
    }

    #[test]
    fn test_whitelist_owner_gated() {
        let mut nft = restricted_collection();
        let result = nft.add_to_whitelist("addr1", &["addr1".to_string()]);
        assert!(matches!(result, Err(NftError::NotOwner(_))));
    }
}
