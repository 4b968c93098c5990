//! Membership drop coordinator
//!
//! The single entry point for minting membership tokens. Each collection
//! registers a [`PublicDrop`] (time window, per-wallet cap, price); the
//! coordinator enforces it and mints through the collection's drop-only
//! path.

use crate::membership::membership::{MembershipError, MembershipNft};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Drop errors
#[derive(Error, Debug)]
pub enum DropError {
    #[error("No public drop configured for {0}")]
    NoPublicDrop(String),
    #[error("Public drop is not active")]
    DropNotActive,
    #[error("Exceeds per-wallet limit: requested {requested}, limit {limit}")]
    ExceedsMaxMintable { requested: u32, limit: u32 },
    #[error("Insufficient payment: sent {sent}, need {need}")]
    InsufficientPayment { sent: u128, need: u128 },
    #[error("Membership error: {0}")]
    Membership(#[from] MembershipError),
}

/// Parameters of a public mint phase
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicDrop {
    /// Price per token in base units of native value
    pub mint_price: u128,
    /// Total tokens a single wallet may mint across the drop
    pub max_total_mintable_by_wallet: u32,
    /// Epoch second the drop opens (inclusive)
    pub start_time: u64,
    /// Epoch second the drop closes (exclusive)
    pub end_time: u64,
}

impl Default for PublicDrop {
    fn default() -> Self {
        Self {
            mint_price: 0,
            max_total_mintable_by_wallet: 1,
            start_time: 0,
            end_time: u64::MAX,
        }
    }
}

impl PublicDrop {
    /// Whether the drop is open at `now`
    pub fn is_active(&self, now: u64) -> bool {
        now >= self.start_time && now < self.end_time
    }
}

/// Mint coordinator shared by membership collections
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct MembershipDrop {
    /// Unique drop address; registered with collections as the allowed minter
    pub address: String,
    /// Public drop parameters per collection address
    public_drops: HashMap<String, PublicDrop>,
    /// Tokens minted so far: collection address -> minter -> count
    minted_by_wallet: HashMap<String, HashMap<String, u32>>,
}

impl MembershipDrop {
    /// Create a new drop coordinator
    pub fn new(address: String) -> Self {
        Self {
            address,
            public_drops: HashMap::new(),
            minted_by_wallet: HashMap::new(),
        }
    }

    /// Register or replace a collection's public drop parameters
    pub fn update_public_drop(&mut self, collection_address: &str, drop: PublicDrop) {
        log::info!(
            "Public drop for {} open [{}, {})",
            collection_address,
            drop.start_time,
            drop.end_time
        );
        self.public_drops.insert(collection_address.to_string(), drop);
    }

    /// Get a collection's public drop parameters
    pub fn public_drop(&self, collection_address: &str) -> Option<&PublicDrop> {
        self.public_drops.get(collection_address)
    }

    /// Tokens `minter` has minted from a collection through this drop
    pub fn minted_count(&self, collection_address: &str, minter: &str) -> u32 {
        self.minted_by_wallet
            .get(collection_address)
            .and_then(|by_wallet| by_wallet.get(minter))
            .copied()
            .unwrap_or(0)
    }

    /// Mint `quantity` tokens from the public drop
    ///
    /// Enforces the time window, the per-wallet limit and the price, then
    /// mints through the collection's drop-only path. Returns the minted
    /// token ids.
    pub fn mint_public(
        &mut self,
        collection: &mut MembershipNft,
        minter: &str,
        quantity: u32,
        value: u128,
        now: u64,
    ) -> Result<Vec<u64>, DropError> {
        let drop = self
            .public_drops
            .get(&collection.address)
            .ok_or_else(|| DropError::NoPublicDrop(collection.address.clone()))?;

        if !drop.is_active(now) {
            return Err(DropError::DropNotActive);
        }

        let already = self.minted_count(&collection.address, minter);
        let limit = drop.max_total_mintable_by_wallet;
        // Compared in u64; the u32 sum could wrap
        if already as u64 + quantity as u64 > limit as u64 {
            return Err(DropError::ExceedsMaxMintable {
                requested: already.saturating_add(quantity),
                limit,
            });
        }

        let need = drop.mint_price * quantity as u128;
        if value < need {
            return Err(DropError::InsufficientPayment { sent: value, need });
        }

        let mut token_ids = Vec::with_capacity(quantity as usize);
        for _ in 0..quantity {
            token_ids.push(collection.mint_drop(&self.address, minter)?);
        }

        *self
            .minted_by_wallet
            .entry(collection.address.clone())
            .or_default()
            .entry(minter.to_string())
            .or_insert(0) += quantity;

        log::info!(
            "{} minted {} token(s) from {}",
            minter,
            quantity,
            collection.symbol
        );
        Ok(token_ids)
    }
}
