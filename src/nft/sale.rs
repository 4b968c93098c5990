//! Tiered-price loyalty NFT sale
//!
//! Sells NFTs for an ERC-20 style payment token. The unit price follows
//! a step schedule driven by total units sold, with an optional
//! time-boxed voucher discount and a one-shot team allocation.

use crate::nft::collection::{NftCollection, NftError};
use crate::token::{Token, TokenError, UNIT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Units sold at the opening price before the schedule starts stepping
const FIRST_TIER_SIZE: u64 = 1200;
/// Units per price step after the first tier
const TIER_SIZE: u64 = 200;
/// One-shot NFT allocation minted to the dev address
const TEAM_ALLOCATION: u64 = 500;

/// Sale errors
#[derive(Error, Debug)]
pub enum SaleError {
    #[error("Caller is not the sale owner: {0}")]
    NotOwner(String),
    #[error("Invalid time: voucher start is after end")]
    InvalidTimeRange,
    #[error("Invalid percent: {0}")]
    InvalidPercent(u8),
    #[error("Team allocation already dropped")]
    AlreadyDropped,
    #[error("Price schedule must not be empty")]
    EmptyPriceSchedule,
    #[error("Purchase count must be greater than 0")]
    InvalidCount,
    #[error("Payment failed: {0}")]
    Payment(#[from] TokenError),
    #[error("NFT error: {0}")]
    Nft(#[from] NftError),
}

/// A time-boxed percentage discount on the current tier price
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Voucher {
    /// Epoch second the discount starts
    pub start: u64,
    /// Epoch second the discount ends (inclusive)
    pub end: u64,
    /// Discount in percent, 1..=100
    pub discount_percent: u8,
}

impl Voucher {
    /// Whether the voucher applies at `now`
    pub fn is_active(&self, now: u64) -> bool {
        self.start <= now && now <= self.end
    }
}

/// Tiered-price NFT sale
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoyalSale {
    /// Sale address; receives payment and acts as the ERC-20 spender
    pub address: String,
    /// The collection being sold
    pub collection: NftCollection,
    /// Sale owner; gates voucher, whitelist, and team drop
    owner: String,
    /// Receives the team allocation
    dev_address: String,
    /// Whole payment tokens per NFT, one entry per tier
    prices: Vec<u64>,
    /// Units sold so far
    total_sold: u64,
    /// Active or scheduled voucher, if any
    voucher: Option<Voucher>,
    /// True once the team allocation has been minted
    team_dropped: bool,
}

impl LoyalSale {
    /// Create a new sale over `collection`
    pub fn new(
        address: String,
        collection: NftCollection,
        owner: String,
        dev_address: String,
        prices: Vec<u64>,
    ) -> Result<Self, SaleError> {
        if prices.is_empty() {
            return Err(SaleError::EmptyPriceSchedule);
        }

        Ok(Self {
            address,
            collection,
            owner,
            dev_address,
            prices,
            total_sold: 0,
            voucher: None,
            team_dropped: false,
        })
    }

    /// Units sold so far
    pub fn total_sold(&self) -> u64 {
        self.total_sold
    }

    /// The configured voucher, if any
    pub fn voucher(&self) -> Option<&Voucher> {
        self.voucher.as_ref()
    }

    /// Current undiscounted tier price in whole payment tokens
    ///
    /// The first `FIRST_TIER_SIZE` units sell at the opening price; after
    /// that the price steps up every `TIER_SIZE` units, capped at the
    /// last schedule entry.
    pub fn current_price(&self) -> u64 {
        self.prices[self.tier_index()]
    }

    fn tier_index(&self) -> usize {
        if self.total_sold < FIRST_TIER_SIZE {
            return 0;
        }
        let steps = 1 + ((self.total_sold - FIRST_TIER_SIZE) / TIER_SIZE) as usize;
        steps.min(self.prices.len() - 1)
    }

    /// Price actually charged per unit at `now`, voucher applied
    pub fn charged_price(&self, now: u64) -> u64 {
        let base = self.current_price();
        match &self.voucher {
            Some(v) if v.is_active(now) => base * (100 - v.discount_percent as u64) / 100,
            _ => base,
        }
    }

    /// Buy `count` NFTs at the current price
    ///
    /// The unit price is fixed at purchase start, even if the purchase
    /// crosses a tier boundary. Payment is pulled from the buyer's
    /// allowance for the sale address.
    pub fn buy(
        &mut self,
        payment: &mut Token,
        buyer: &str,
        count: u64,
        now: u64,
    ) -> Result<(), SaleError> {
        if count == 0 {
            return Err(SaleError::InvalidCount);
        }

        let unit_price = self.charged_price(now);
        let cost = unit_price as u128 * count as u128 * UNIT;
        // A 100% voucher makes the purchase free; nothing to pull
        if cost > 0 {
            payment.transfer_from(&self.address, buyer, &self.address, cost)?;
        }

        for _ in 0..count {
            self.collection.mint(buyer)?;
        }
        self.total_sold += count;

        Ok(())
    }

    /// Configure a voucher; sale-owner gated
    pub fn set_voucher(
        &mut self,
        caller: &str,
        start: u64,
        end: u64,
        discount_percent: u8,
    ) -> Result<(), SaleError> {
        if caller != self.owner {
            return Err(SaleError::NotOwner(caller.to_string()));
        }
        if start > end {
            return Err(SaleError::InvalidTimeRange);
        }
        if discount_percent == 0 || discount_percent > 100 {
            return Err(SaleError::InvalidPercent(discount_percent));
        }

        self.voucher = Some(Voucher {
            start,
            end,
            discount_percent,
        });
        Ok(())
    }

    /// Mint the one-shot team allocation to the dev address
    pub fn drop_for_team(&mut self, caller: &str) -> Result<(), SaleError> {
        if caller != self.owner {
            return Err(SaleError::NotOwner(caller.to_string()));
        }
        if self.team_dropped {
            return Err(SaleError::AlreadyDropped);
        }

        for _ in 0..TEAM_ALLOCATION {
            self.collection.mint(&self.dev_address)?;
        }
        self.team_dropped = true;

        log::info!(
            "Team allocation of {} NFTs dropped to {}",
            TEAM_ALLOCATION,
            self.dev_address
        );
        Ok(())
    }

    /// Add senders to the collection's transfer whitelist; owner gated
    pub fn add_to_whitelist(&mut self, caller: &str, accounts: &[String]) -> Result<(), SaleError> {
        if caller != self.owner {
            return Err(SaleError::NotOwner(caller.to_string()));
        }
        // Collection owner is the sale owner, so the forwarded gate passes
        self.collection.add_to_whitelist(caller, accounts)?;
        Ok(())
    }
}
