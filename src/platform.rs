//! Platform state root
//!
//! [`Platform`] owns the administrator ledger and every component the
//! board can call: the contribution token, the payment and reward
//! tokens, the NFT sale, the membership collection and drop, and the
//! stake contract. It implements call relaying by dispatching decoded
//! [`PlatformCall`] payloads on the target address, and is the unit of
//! persistence.

use crate::admin::{AdminError, AdminLedger, AdminTransaction, CallRelay, CallRequest, RelayError};
use crate::crypto::sha256_hex;
use crate::membership::{MembershipConfig, MembershipDrop, MembershipNft, PublicDrop, MAX_LEVEL};
use crate::nft::{LoyalSale, NftCollection, SaleError};
use crate::stake::NftStake;
use crate::token::{ContributionToken, Token};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling a platform
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Admin error: {0}")]
    Admin(#[from] AdminError),
    #[error("Sale error: {0}")]
    Sale(#[from] SaleError),
}

/// A call payload the board can relay to a component
///
/// Payloads travel through the ledger as JSON bytes; the relay decodes
/// them and dispatches on the transaction's target address. Amounts are
/// base units for [`Transfer`](Self::Transfer) and whole tokens for
/// reward splits, matching the component APIs.
///
/// Externally tagged on the wire, e.g.
/// `{"transfer":{"to":"carol","amount":100}}`. Internal tagging would
/// buffer field contents and serde_json cannot buffer `u128` amounts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PlatformCall {
    /// Move base units from the board's balance on a fungible token
    Transfer { to: String, amount: u128 },
    /// Add accounts to the contribution token whitelist
    CpAddToWhitelist { accounts: Vec<String> },
    /// Publish a season's reward split on the stake contract
    CreateReward {
        recipients: Vec<String>,
        amounts: Vec<u128>,
        total: u128,
        season: u32,
    },
}

impl PlatformCall {
    /// Encode the payload for a ledger transaction
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a ledger transaction payload
    pub fn decode(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// The components reachable through the relay
///
/// Held separately from the ledger so executing a transaction can
/// borrow the ledger and the targets at the same time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformTargets {
    /// Contribution point token, administered by the board
    pub cp: ContributionToken,
    /// Payment token the sale settles in
    pub payment: Token,
    /// Reward token the stake contract pays out
    pub reward: Token,
    /// Tiered-price NFT sale
    pub sale: LoyalSale,
    /// Soulbound membership collection
    pub membership: MembershipNft,
    /// Membership mint coordinator
    pub drop: MembershipDrop,
    /// NFT stake escrow
    pub stake: NftStake,
}

impl CallRelay for PlatformTargets {
    fn relay(&mut self, caller: &str, call: &CallRequest) -> Result<(), RelayError> {
        let payload = PlatformCall::decode(&call.data)
            .map_err(|e| RelayError::InvalidPayload(e.to_string()))?;

        if call.target == self.payment.address || call.target == self.reward.address {
            let token = if call.target == self.payment.address {
                &mut self.payment
            } else {
                &mut self.reward
            };
            return match payload {
                PlatformCall::Transfer { to, amount } => token
                    .transfer(caller, &to, amount)
                    .map_err(|e| RelayError::TargetError(e.to_string())),
                _ => Err(RelayError::InvalidPayload(format!(
                    "unsupported operation for token {}",
                    token.symbol
                ))),
            };
        }

        if call.target == self.cp.address {
            return match payload {
                PlatformCall::CpAddToWhitelist { accounts } => self
                    .cp
                    .add_to_whitelist(caller, &accounts)
                    .map_err(|e| RelayError::TargetError(e.to_string())),
                _ => Err(RelayError::InvalidPayload(
                    "unsupported operation for CP token".to_string(),
                )),
            };
        }

        if call.target == self.stake.address {
            return match payload {
                PlatformCall::CreateReward {
                    recipients,
                    amounts,
                    total,
                    season,
                } => self
                    .stake
                    .create_reward(caller, &recipients, &amounts, total, season)
                    .map_err(|e| RelayError::TargetError(e.to_string())),
                _ => Err(RelayError::InvalidPayload(
                    "unsupported operation for stake".to_string(),
                )),
            };
        }

        Err(RelayError::UnknownTarget(call.target.clone()))
    }
}

/// The whole platform: ledger plus call targets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Platform {
    /// Quorum-gated administrator ledger
    pub ledger: AdminLedger,
    /// Components reachable through the relay
    pub targets: PlatformTargets,
    /// Deployer address; owns the sale and the membership collection
    pub owner: String,
}

/// Derive a stable component address from its label
fn component_address(label: &str) -> String {
    format!("0x{}", &sha256_hex(label.as_bytes())[..40])
}

/// Opening price schedule: 50 tiers stepping up 10 tokens each
fn default_prices() -> Vec<u64> {
    (0..50).map(|i| 1000 + 10 * i).collect()
}

impl Platform {
    /// Assemble a platform for the given administrator set and quorum
    ///
    /// Components get stable derived addresses; the sale whitelists the
    /// stake contract so purchased NFTs can be escrowed, and the
    /// membership collection is wired to mint only through the drop.
    pub fn new(
        administrators: Vec<String>,
        required: u8,
        owner: String,
        dev_address: String,
    ) -> Result<Self, PlatformError> {
        let ledger = AdminLedger::new(administrators, required)?;
        let board_address = ledger.board().address().to_string();

        let cp = ContributionToken::new(
            "Contribution Point",
            "CP",
            component_address("token/cp"),
            board_address.clone(),
        );
        let payment = Token::new("USD Coin", "USDC", component_address("token/usdc"));
        let reward = Token::new("Reward Token", "MEWA", component_address("token/mewa"));

        let collection = NftCollection::new(
            "Loyal NFT",
            "LNFT",
            component_address("nft/loyal"),
            owner.clone(),
            true,
        );
        let mut sale = LoyalSale::new(
            component_address("sale/loyal"),
            collection,
            owner.clone(),
            dev_address,
            default_prices(),
        )?;

        let stake = NftStake::new(component_address("stake/loyal"), board_address);
        sale.add_to_whitelist(&owner, &[stake.address.clone()])?;

        let mut drop = MembershipDrop::new(component_address("drop/membership"));
        let level_uris = (0..=MAX_LEVEL)
            .map(|level| format!("ipfs://membership/{}.json", level))
            .collect();
        let mut membership = MembershipNft::new(
            "Membership NFT",
            "MEM",
            component_address("nft/membership"),
            owner.clone(),
            level_uris,
        );
        let public_drop = membership
            .multi_configure(
                &owner,
                MembershipConfig {
                    max_supply: 10_000,
                    drop_address: drop.address.clone(),
                    public_drop: PublicDrop::default(),
                },
            )
            .map_err(|e| AdminError::CallFailed(RelayError::TargetError(e.to_string())))?;
        drop.update_public_drop(&membership.address, public_drop);

        log::info!(
            "Platform assembled: board {}",
            ledger.board().description()
        );

        Ok(Self {
            ledger,
            targets: PlatformTargets {
                cp,
                payment,
                reward,
                sale,
                membership,
                drop,
                stake,
            },
            owner,
        })
    }

    /// The administrator board address
    pub fn board_address(&self) -> &str {
        self.ledger.board().address()
    }

    /// Propose a call; see [`AdminLedger::submit_transaction`]
    pub fn submit_call(
        &mut self,
        caller: &str,
        target: &str,
        value: u128,
        call: &PlatformCall,
    ) -> Result<u64, AdminError> {
        let data = call
            .encode()
            .map_err(|e| AdminError::CallFailed(RelayError::InvalidPayload(e.to_string())))?;
        self.ledger.submit_transaction(caller, target, value, data)
    }

    /// Confirm a pending transaction
    pub fn confirm_transaction(&mut self, caller: &str, tx_id: u64) -> Result<(), AdminError> {
        self.ledger.confirm_transaction(caller, tx_id)
    }

    /// Execute a confirmed transaction against the platform components
    pub fn execute_transaction(&mut self, caller: &str, tx_id: u64) -> Result<(), AdminError> {
        self.ledger
            .execute_transaction(caller, tx_id, &mut self.targets)
    }

    /// Read-only accessor for a transaction record
    pub fn transaction(&self, tx_id: u64) -> Result<&AdminTransaction, AdminError> {
        self.ledger.transaction(tx_id)
    }
}
