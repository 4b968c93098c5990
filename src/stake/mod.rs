//! NFT staking
//!
//! [`NftStake`] escrows NFTs per season and pays board-published reward
//! splits on claim.

pub mod stake;

pub use stake::{NftStake, SeasonReward, StakeError, StakeInfo};
