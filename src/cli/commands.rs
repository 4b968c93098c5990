//! CLI commands for the loyalty platform
//!
//! Implements all command handlers for the CLI interface.

use crate::platform::{Platform, PlatformCall};
use crate::storage::{Storage, StorageConfig};
use std::path::PathBuf;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub platform: Platform,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state from a saved platform
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };

        let storage = Storage::new(storage_config)?;

        if !storage.exists() {
            return Err("No platform found. Initialize one with: loyalty init".into());
        }
        let platform = storage.load()?;

        Ok(Self {
            platform,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.platform)?;
        Ok(())
    }
}

/// Initialize a new platform
pub fn cmd_init(
    data_dir: &PathBuf,
    administrators: Vec<String>,
    required: u8,
    owner: &str,
    dev_address: &str,
) -> CliResult<()> {
    let storage_config = StorageConfig {
        data_dir: data_dir.clone(),
        ..Default::default()
    };

    let storage = Storage::new(storage_config)?;

    if storage.exists() {
        println!("⚠️  Platform already exists at {:?}", data_dir);
        println!("   Delete the data directory to reinitialize.");
        return Ok(());
    }

    let platform = Platform::new(
        administrators,
        required,
        owner.to_string(),
        dev_address.to_string(),
    )?;
    storage.save(&platform)?;

    println!("✅ Platform initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   🏛️  Board: {}", platform.ledger.board().description());
    println!("   📍 Board address: {}", platform.board_address());
    println!("   🪙 CP token: {}", platform.targets.cp.address);
    println!("   💵 Payment token: {}", platform.targets.payment.address);
    println!("   🎁 Reward token: {}", platform.targets.reward.address);
    println!("   🖼️  Sale: {}", platform.targets.sale.address);
    println!("   📦 Stake: {}", platform.targets.stake.address);

    Ok(())
}

/// Show the administrator board
pub fn cmd_board(state: &AppState) -> CliResult<()> {
    let board = state.platform.ledger.board();

    println!("🏛️  Administrator Board ({})", board.description());
    println!("   Address: {}", board.address());
    for admin in &board.administrators {
        println!("   └─ {}", admin);
    }

    Ok(())
}

/// Submit a transaction from a JSON call payload
pub fn cmd_tx_submit(
    state: &mut AppState,
    from: &str,
    target: &str,
    value: u128,
    payload: &str,
) -> CliResult<()> {
    let call: PlatformCall = serde_json::from_str(payload)?;
    let tx_id = state.platform.submit_call(from, target, value, &call)?;
    state.save()?;

    println!("📤 Transaction {} submitted", tx_id);
    println!("   From: {}", from);
    println!("   Target: {}", target);
    println!("   Call: {:?}", call);
    println!(
        "\n   {} confirmation(s) required before execution.",
        state.platform.ledger.board().required()
    );

    Ok(())
}

/// Confirm a pending transaction
pub fn cmd_tx_confirm(state: &mut AppState, from: &str, tx_id: u64) -> CliResult<()> {
    state.platform.confirm_transaction(from, tx_id)?;
    state.save()?;

    let tx = state.platform.transaction(tx_id)?;
    let required = state.platform.ledger.board().required();

    println!("✍️  Transaction {} confirmed by {}", tx_id, from);
    println!(
        "   Confirmations: {}/{}",
        tx.num_confirmations, required
    );
    if tx.num_confirmations >= required as u32 {
        println!("   ✅ Quorum reached; any administrator may execute.");
    }

    Ok(())
}

/// Execute a confirmed transaction
pub fn cmd_tx_execute(state: &mut AppState, from: &str, tx_id: u64) -> CliResult<()> {
    state.platform.execute_transaction(from, tx_id)?;
    state.save()?;

    println!("🚀 Transaction {} executed by {}", tx_id, from);

    Ok(())
}

/// Show one transaction
pub fn cmd_tx_show(state: &AppState, tx_id: u64) -> CliResult<()> {
    let tx = state.platform.transaction(tx_id)?;

    println!("📄 Transaction {}", tx.id);
    println!("   ├─ Target: {}", tx.target());
    println!("   ├─ Value: {}", tx.value());
    println!("   ├─ Submitted by: {}", tx.submitted_by);
    println!(
        "   ├─ Submitted at: {}",
        tx.submitted_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("   ├─ Confirmations: {}", tx.num_confirmations);
    println!("   ├─ Executed: {}", tx.executed);
    if let Some(at) = tx.executed_at {
        println!("   ├─ Executed at: {}", at.format("%Y-%m-%d %H:%M:%S"));
    }
    match PlatformCall::decode(tx.data()) {
        Ok(call) => println!("   └─ Call: {:?}", call),
        Err(_) => println!("   └─ Payload: {}", tx.call.data_hex()),
    }

    Ok(())
}

/// List transactions
pub fn cmd_tx_list(state: &AppState, pending_only: bool) -> CliResult<()> {
    let transactions: Vec<_> = if pending_only {
        state.platform.ledger.pending_transactions()
    } else {
        state.platform.ledger.list_transactions().iter().collect()
    };

    if transactions.is_empty() {
        println!("📭 No transactions.");
        return Ok(());
    }

    println!("📋 Transactions:");
    for tx in transactions {
        let status = if tx.executed { "executed" } else { "pending" };
        println!(
            "   #{} | {} | {} confirmation(s) | {} | by {}",
            tx.id,
            tx.target(),
            tx.num_confirmations,
            status,
            tx.submitted_by
        );
    }

    Ok(())
}

/// Show a token balance
pub fn cmd_balance(state: &AppState, token: &str, account: &str) -> CliResult<()> {
    let targets = &state.platform.targets;
    let (symbol, balance) = if token.eq_ignore_ascii_case(&targets.cp.symbol) {
        (targets.cp.symbol.clone(), targets.cp.balance_of(account))
    } else if token.eq_ignore_ascii_case(&targets.payment.symbol) {
        (
            targets.payment.symbol.clone(),
            targets.payment.balance_of(account),
        )
    } else if token.eq_ignore_ascii_case(&targets.reward.symbol) {
        (
            targets.reward.symbol.clone(),
            targets.reward.balance_of(account),
        )
    } else {
        println!("❌ Unknown token: {}", token);
        return Ok(());
    };

    println!("💰 {} balance for {}", symbol, account);
    println!("   {} base units", balance);

    Ok(())
}

/// Encode a call payload to hex without touching platform state
pub fn cmd_call_encode(payload: &str) -> CliResult<()> {
    let call: PlatformCall = serde_json::from_str(payload)?;
    let data = call.encode()?;

    println!("🔧 Encoded call");
    println!("   Call: {:?}", call);
    println!("   Hex: {}", hex::encode(&data));
    println!("   Bytes: {}", data.len());

    Ok(())
}

/// Export the platform to a file
pub fn cmd_export(state: &AppState, path: &PathBuf) -> CliResult<()> {
    crate::storage::save_to_file(&state.platform, path)?;
    println!("📦 Platform exported to {:?}", path);
    Ok(())
}

/// Import a platform from a file
pub fn cmd_import(state: &mut AppState, path: &PathBuf) -> CliResult<()> {
    let platform = crate::storage::load_from_file(path)?;

    state.platform = platform;
    state.save()?;

    println!("📥 Platform imported from {:?}", path);
    println!(
        "   {} transaction(s) on record",
        state.platform.ledger.transaction_count()
    );

    Ok(())
}
