//! Membership NFT
//!
//! A soulbound (non-transferable) NFT minted only through the configured
//! drop. Each token carries a level 0..=12; holders raise a token's
//! level by burning contribution points, and the token URI follows the
//! level.

use crate::membership::drop::PublicDrop;
use crate::token::{ContributionToken, CpError, UNIT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Highest reachable membership level
pub const MAX_LEVEL: u8 = 12;

/// Membership NFT errors
#[derive(Error, Debug)]
pub enum MembershipError {
    #[error("Only the allowed drop may mint: {0}")]
    OnlyAllowedDrop(String),
    #[error("Membership NFT is non-transferable")]
    TransferDisabled,
    #[error("Invalid level: {0}")]
    InvalidLevel(u8),
    #[error("Not owner of token {token_id}: {caller}")]
    NotTokenOwner { token_id: u64, caller: String },
    #[error("Not enough CP: have {have}, need {need}")]
    NotEnoughCp { have: u128, need: u128 },
    #[error("Unknown token: {0}")]
    UnknownToken(u64),
    #[error("Caller is not the collection owner: {0}")]
    NotOwner(String),
    #[error("Max supply reached: {0}")]
    MaxSupplyReached(u64),
    #[error("No drop configured")]
    NoDropConfigured,
    #[error("CP error: {0}")]
    Cp(#[from] CpError),
}

/// One-call configuration for a membership collection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MembershipConfig {
    /// Cap on total minted tokens
    pub max_supply: u64,
    /// Address of the drop allowed to mint
    pub drop_address: String,
    /// Public drop parameters, registered with the drop
    pub public_drop: PublicDrop,
}

/// Soulbound membership NFT with per-token levels
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MembershipNft {
    /// Collection name
    pub name: String,
    /// Collection symbol
    pub symbol: String,
    /// Unique collection address
    pub address: String,
    /// Collection owner; gates configuration
    owner: String,
    /// The only address allowed to mint, once configured
    drop_address: Option<String>,
    /// Token owners: token id -> holder
    owners: HashMap<u64, String>,
    /// Token levels: token id -> level
    levels: HashMap<u64, u8>,
    /// Token URI per level, `MAX_LEVEL + 1` entries
    level_uris: Vec<String>,
    /// Next token id; membership ids start at 1
    next_token_id: u64,
    /// Cap on total minted tokens
    max_supply: Option<u64>,
}

impl MembershipNft {
    /// Create a new membership collection
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        address: String,
        owner: String,
        level_uris: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            address,
            owner,
            drop_address: None,
            owners: HashMap::new(),
            levels: HashMap::new(),
            level_uris,
            next_token_id: 1,
            max_supply: None,
        }
    }

    /// Apply a one-call configuration; owner gated
    ///
    /// Returns the public drop parameters so the caller can register
    /// them with the drop coordinator.
    pub fn multi_configure(
        &mut self,
        caller: &str,
        config: MembershipConfig,
    ) -> Result<PublicDrop, MembershipError> {
        if caller != self.owner {
            return Err(MembershipError::NotOwner(caller.to_string()));
        }

        self.max_supply = Some(config.max_supply);
        self.drop_address = Some(config.drop_address);
        Ok(config.public_drop)
    }

    /// Mint a token to `to`; only callable by the configured drop
    pub fn mint_drop(&mut self, caller: &str, to: &str) -> Result<u64, MembershipError> {
        match &self.drop_address {
            Some(drop) if drop == caller => {}
            Some(_) => return Err(MembershipError::OnlyAllowedDrop(caller.to_string())),
            None => return Err(MembershipError::NoDropConfigured),
        }

        if let Some(max) = self.max_supply {
            if self.total_minted() >= max {
                return Err(MembershipError::MaxSupplyReached(max));
            }
        }

        let token_id = self.next_token_id;
        self.next_token_id += 1;
        self.owners.insert(token_id, to.to_string());
        self.levels.insert(token_id, 0);
        Ok(token_id)
    }

    /// Get the owner of a token
    pub fn owner_of(&self, token_id: u64) -> Result<&str, MembershipError> {
        self.owners
            .get(&token_id)
            .map(String::as_str)
            .ok_or(MembershipError::UnknownToken(token_id))
    }

    /// Count tokens held by an address
    pub fn balance_of(&self, address: &str) -> usize {
        self.owners.values().filter(|o| *o == address).count()
    }

    /// Total tokens minted so far
    pub fn total_minted(&self) -> u64 {
        self.next_token_id - 1
    }

    /// Get a token's level
    pub fn level_of(&self, token_id: u64) -> Result<u8, MembershipError> {
        self.levels
            .get(&token_id)
            .copied()
            .ok_or(MembershipError::UnknownToken(token_id))
    }

    /// CP cost in base units to move a token to `level`
    ///
    /// Doubles per level: 1000 CP for level 1, 2000 for level 2, and so
    /// on up to level 12.
    pub fn level_cost(level: u8) -> u128 {
        if level == 0 {
            return 0;
        }
        1000u128 * (1u128 << (level - 1)) * UNIT
    }

    /// Raise a token to `level`, burning the holder's CP
    ///
    /// The collection address must be whitelisted on the CP token so it
    /// can burn on the holder's behalf.
    pub fn update_level(
        &mut self,
        caller: &str,
        cp: &mut ContributionToken,
        token_id: u64,
        level: u8,
    ) -> Result<(), MembershipError> {
        if level > MAX_LEVEL {
            return Err(MembershipError::InvalidLevel(level));
        }

        let owner = self.owner_of(token_id)?;
        if owner != caller {
            return Err(MembershipError::NotTokenOwner {
                token_id,
                caller: caller.to_string(),
            });
        }

        let cost = Self::level_cost(level);
        let have = cp.balance_of(caller);
        if have < cost {
            return Err(MembershipError::NotEnoughCp { have, need: cost });
        }
        if cost > 0 {
            cp.burn(&self.address, caller, cost)?;
        }

        self.levels.insert(token_id, level);
        Ok(())
    }

    /// Token URI, resolved through the level-URI table
    pub fn token_uri(&self, token_id: u64) -> Result<&str, MembershipError> {
        let level = self.level_of(token_id)?;
        self.level_uris
            .get(level as usize)
            .map(String::as_str)
            .ok_or(MembershipError::InvalidLevel(level))
    }

    /// The full level-URI table
    pub fn level_uris(&self) -> &[String] {
        &self.level_uris
    }

    /// Transfers are permanently disabled
    pub fn transfer(&mut self, _caller: &str, _to: &str, _token_id: u64) -> Result<(), MembershipError> {
        Err(MembershipError::TransferDisabled)
    }
}
