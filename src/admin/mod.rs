//! Multisig administrator ledger
//!
//! Gates arbitrary component calls behind M-of-N confirmation from a
//! fixed administrator board. Each proposed call is tracked through
//! propose -> confirm -> execute; once quorum is reached any
//! administrator may trigger execution, which relays the call to its
//! target through a [`CallRelay`].
//!
//! # Example
//!
//! ```ignore
//! use loyalty_ledger::admin::AdminLedger;
//!
//! // 2-of-3 board
//! let mut ledger = AdminLedger::new(vec![alice, bob, david], 2)?;
//!
//! let id = ledger.submit_transaction(&alice, &token_addr, 0, payload)?;
//! ledger.confirm_transaction(&alice, id)?;
//! ledger.confirm_transaction(&bob, id)?;
//! ledger.execute_transaction(&david, id, &mut platform)?;
//! ```

pub mod board;
pub mod ledger;
pub mod relay;
pub mod transaction;

pub use board::{AdminBoard, BoardError};
pub use ledger::{AdminError, AdminLedger};
pub use relay::{CallRelay, RelayError};
pub use transaction::{AdminTransaction, CallRequest};
