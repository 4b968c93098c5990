//! NFT ownership and sale
//!
//! [`NftCollection`] is the ownership ledger; [`LoyalSale`] sells a
//! restricted collection at tier-stepped prices with voucher discounts.

pub mod collection;
pub mod sale;

pub use collection::{NftCollection, NftError};
pub use sale::{LoyalSale, SaleError, Voucher};
