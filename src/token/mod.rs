//! Fungible token ledgers
//!
//! The platform settles in two kinds of fungible value: ordinary ERC-20
//! style tokens ([`Token`], used for payments and staking rewards) and
//! the non-transferable contribution point token
//! ([`ContributionToken`]), minted against signed permits and spent on
//! membership level-ups.

pub mod contribution;
pub mod token;

pub use contribution::{ContributionToken, CpError, MintPermit};
pub use token::{Token, TokenError};

/// Base units per whole token (18 decimal places)
pub const UNIT: u128 = 1_000_000_000_000_000_000;
