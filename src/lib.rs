//! Loyalty Ledger: a multisig-governed loyalty platform in Rust
//!
//! This crate models a loyalty platform whose privileged operations are
//! gated behind an M-of-N administrator board:
//! - Multisig transaction ledger (propose -> confirm -> execute)
//! - Non-transferable contribution point token minted against signed
//!   permits (ECDSA, secp256k1)
//! - Tiered-price NFT sale with voucher discounts
//! - Soulbound membership NFTs with CP-funded levels and public drops
//! - NFT staking with board-published seasonal rewards
//! - JSON persistence with atomic writes and rotating backups
//!
//! # Example
//!
//! ```rust
//! use loyalty_ledger::platform::{Platform, PlatformCall};
//!
//! // 2-of-3 administrator board
//! let mut platform = Platform::new(
//!     vec!["alice".into(), "bob".into(), "david".into()],
//!     2,
//!     "deployer".into(),
//!     "dev".into(),
//! )
//! .unwrap();
//!
//! // Fund the board, then move tokens by quorum
//! let board = platform.board_address().to_string();
//! platform.targets.payment.mint(&board, 1_000).unwrap();
//!
//! let target = platform.targets.payment.address.clone();
//! let call = PlatformCall::Transfer {
//!     to: "carol".into(),
//!     amount: 100 * loyalty_ledger::token::UNIT,
//! };
//! let tx_id = platform.submit_call("alice", &target, 0, &call).unwrap();
//! platform.confirm_transaction("alice", tx_id).unwrap();
//! platform.confirm_transaction("bob", tx_id).unwrap();
//! platform.execute_transaction("david", tx_id).unwrap();
//!
//! assert!(platform.targets.payment.balance_of("carol") > 0);
//! ```

pub mod admin;
pub mod cli;
pub mod crypto;
pub mod membership;
pub mod nft;
pub mod platform;
pub mod stake;
pub mod storage;
pub mod token;

// Re-export commonly used types
pub use admin::{AdminBoard, AdminError, AdminLedger, AdminTransaction, CallRelay, CallRequest};
pub use crypto::KeyPair;
pub use membership::{MembershipDrop, MembershipNft, PublicDrop};
pub use nft::{LoyalSale, NftCollection, Voucher};
pub use platform::{Platform, PlatformCall, PlatformTargets};
pub use stake::NftStake;
pub use storage::{Storage, StorageConfig};
pub use token::{ContributionToken, MintPermit, Token, UNIT};
