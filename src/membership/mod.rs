//! Membership NFTs and drops
//!
//! [`MembershipNft`] is a soulbound collection with CP-funded levels;
//! [`MembershipDrop`] is the only mint path, enforcing public drop
//! windows and per-wallet limits.

pub mod drop;
pub mod membership;

pub use drop::{DropError, MembershipDrop, PublicDrop};
pub use membership::{MembershipConfig, MembershipError, MembershipNft, MAX_LEVEL};
