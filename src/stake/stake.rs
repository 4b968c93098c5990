//! NFT staking and seasonal rewards
//!
//! Holders escrow NFTs into the stake contract for a season. The
//! administrator board publishes one reward split per season; claiming
//! returns the escrowed NFTs and pays the caller's share from the stake
//! contract's reward balance.

use crate::nft::{NftCollection, NftError};
use crate::token::{Token, TokenError, UNIT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Staking errors
#[derive(Error, Debug)]
pub enum StakeError {
    #[error("Not owner of token {token_id}: {caller}")]
    NotItemOwner { token_id: u64, caller: String },
    #[error("Token already staked: {0}")]
    AlreadyStaked(u64),
    #[error("Token is not staked: {0}")]
    NotStaked(u64),
    #[error("Token {token_id} is not staked in season {season}")]
    WrongSeason { token_id: u64, season: u32 },
    #[error("Reward already exists for season {0}")]
    RewardExists(u32),
    #[error("No reward for season {0}")]
    NoReward(u32),
    #[error("Recipients and amounts differ in length")]
    LengthMismatch,
    #[error("Reward amounts sum to {sum}, expected {total}")]
    InvalidRewardSplit { sum: u128, total: u128 },
    #[error("Caller is not the administrator board: {0}")]
    NotAdmin(String),
    #[error("Nothing to claim for {0}")]
    NothingToClaim(String),
    #[error("NFT error: {0}")]
    Nft(#[from] NftError),
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

/// An escrowed token
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeInfo {
    /// Holder who staked the token and may claim it back
    pub owner: String,
    /// Season the token is staked into
    pub season: u32,
    /// When the token entered escrow
    pub staked_at: DateTime<Utc>,
}

/// A season's reward split
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeasonReward {
    /// Share per recipient in whole tokens
    shares: HashMap<String, u128>,
    /// Sum of all shares in whole tokens
    total: u128,
    /// Recipients already paid out
    paid: HashSet<String>,
}

/// NFT stake escrow with board-published seasonal rewards
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NftStake {
    /// Unique stake contract address; holds escrowed NFTs and reward funds
    pub address: String,
    /// Administrator board address; sole authority over rewards
    admin: String,
    /// Escrowed tokens: token id -> stake info
    stakes: HashMap<u64, StakeInfo>,
    /// Published rewards per season
    rewards: HashMap<u32, SeasonReward>,
}

impl NftStake {
    /// Create a new stake contract administered by `admin`
    pub fn new(address: String, admin: String) -> Self {
        Self {
            address,
            admin,
            stakes: HashMap::new(),
            rewards: HashMap::new(),
        }
    }

    /// Stake info for a token, if escrowed
    pub fn stake_info(&self, token_id: u64) -> Option<&StakeInfo> {
        self.stakes.get(&token_id)
    }

    /// Number of tokens currently escrowed
    pub fn staked_count(&self) -> usize {
        self.stakes.len()
    }

    /// Escrow a token into `season`
    ///
    /// The caller must own the token, and the stake address must be
    /// allowed to transfer on the collection.
    pub fn stake(
        &mut self,
        nft: &mut NftCollection,
        caller: &str,
        token_id: u64,
        season: u32,
    ) -> Result<(), StakeError> {
        if self.stakes.contains_key(&token_id) {
            return Err(StakeError::AlreadyStaked(token_id));
        }
        if nft.owner_of(token_id)? != caller {
            return Err(StakeError::NotItemOwner {
                token_id,
                caller: caller.to_string(),
            });
        }

        nft.operator_transfer(&self.address, caller, &self.address, token_id)?;
        self.stakes.insert(
            token_id,
            StakeInfo {
                owner: caller.to_string(),
                season,
                staked_at: Utc::now(),
            },
        );

        log::info!("{} staked token {} into season {}", caller, token_id, season);
        Ok(())
    }

    /// Publish a season's reward split; board gated
    ///
    /// One split per season; the per-recipient amounts must sum to
    /// `total`. Amounts are whole tokens.
    pub fn create_reward(
        &mut self,
        caller: &str,
        recipients: &[String],
        amounts: &[u128],
        total: u128,
        season: u32,
    ) -> Result<(), StakeError> {
        if caller != self.admin {
            return Err(StakeError::NotAdmin(caller.to_string()));
        }
        if recipients.len() != amounts.len() {
            return Err(StakeError::LengthMismatch);
        }
        let sum: u128 = amounts.iter().sum();
        if sum != total {
            return Err(StakeError::InvalidRewardSplit { sum, total });
        }
        if self.rewards.contains_key(&season) {
            return Err(StakeError::RewardExists(season));
        }

        let shares = recipients
            .iter()
            .cloned()
            .zip(amounts.iter().copied())
            .collect();
        self.rewards.insert(
            season,
            SeasonReward {
                shares,
                total,
                paid: HashSet::new(),
            },
        );

        log::info!(
            "Season {} reward published: {} recipient(s), {} total",
            season,
            recipients.len(),
            total
        );
        Ok(())
    }

    /// A season's published total in whole tokens
    pub fn reward_total(&self, season: u32) -> Option<u128> {
        self.rewards.get(&season).map(|r| r.total)
    }

    /// Claim escrowed tokens and the caller's season share
    ///
    /// Every token id must be escrowed by the caller in `season`. The
    /// NFTs are returned and the caller's share is paid from the stake
    /// address, once per season.
    pub fn claim(
        &mut self,
        nft: &mut NftCollection,
        reward_token: &mut Token,
        caller: &str,
        token_ids: &[u64],
        season: u32,
    ) -> Result<u128, StakeError> {
        // Validate everything before moving state
        for &token_id in token_ids {
            let info = self
                .stakes
                .get(&token_id)
                .ok_or(StakeError::NotStaked(token_id))?;
            if info.owner != caller {
                return Err(StakeError::NotItemOwner {
                    token_id,
                    caller: caller.to_string(),
                });
            }
            if info.season != season {
                return Err(StakeError::WrongSeason { token_id, season });
            }
        }

        let reward = self
            .rewards
            .get_mut(&season)
            .ok_or(StakeError::NoReward(season))?;
        if reward.paid.contains(caller) {
            return Err(StakeError::NothingToClaim(caller.to_string()));
        }
        let share = *reward
            .shares
            .get(caller)
            .ok_or_else(|| StakeError::NothingToClaim(caller.to_string()))?;

        reward_token.transfer(&self.address, caller, share * UNIT)?;
        reward.paid.insert(caller.to_string());

        for &token_id in token_ids {
            nft.operator_transfer(&self.address, &self.address, caller, token_id)?;
            self.stakes.remove(&token_id);
        }

        log::info!(
            "{} claimed {} token(s) and {} reward for season {}",
            caller,
            token_ids.len(),
            share,
            season
        );
        Ok(share * UNIT)
    }
}
