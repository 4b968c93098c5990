//! Loyalty Platform CLI Application
//!
//! A command-line interface for the multisig-governed loyalty platform.

use clap::{Parser, Subcommand};
use loyalty_ledger::cli::{self, AppState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loyalty")]
#[command(version = "0.1.0")]
#[command(about = "A multisig-governed loyalty platform ledger", long_about = None)]
struct Cli {
    /// Data directory for platform storage
    #[arg(short, long, default_value = ".loyalty_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new platform
    Init {
        /// Administrator addresses (comma-separated)
        #[arg(short, long)]
        administrators: String,

        /// Confirmations required before execution
        #[arg(short, long)]
        required: u8,

        /// Platform owner address
        #[arg(short, long, default_value = "deployer")]
        owner: String,

        /// Address receiving the team NFT allocation
        #[arg(long, default_value = "dev")]
        dev_address: String,
    },

    /// Show the administrator board
    Board,

    /// Ledger transaction operations
    Tx {
        #[command(subcommand)]
        action: TxCommands,
    },

    /// Encode a call payload to hex
    Call {
        #[command(subcommand)]
        action: CallCommands,
    },

    /// Show a token balance
    Balance {
        /// Token symbol (CP, USDC, MEWA)
        #[arg(short, long)]
        token: String,

        /// Account address
        #[arg(short, long)]
        account: String,
    },

    /// Export the platform to file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import the platform from file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Subcommand)]
enum CallCommands {
    /// Encode a JSON call payload as relay bytes
    Encode {
        /// Call payload as JSON, e.g. '{"transfer":{"to":"carol","amount":100}}'
        #[arg(short, long)]
        payload: String,
    },
}

#[derive(Subcommand)]
enum TxCommands {
    /// Submit a new transaction
    Submit {
        /// Submitting administrator
        #[arg(short, long)]
        from: String,

        /// Target component address
        #[arg(short, long)]
        target: String,

        /// Native value to forward
        #[arg(short, long, default_value = "0")]
        value: u128,

        /// Call payload as JSON, e.g. '{"transfer":{"to":"carol","amount":100}}'
        #[arg(short, long)]
        payload: String,
    },

    /// Confirm a pending transaction
    Confirm {
        /// Confirming administrator
        #[arg(short, long)]
        from: String,

        /// Transaction id
        #[arg(short, long)]
        tx_id: u64,
    },

    /// Execute a confirmed transaction
    Execute {
        /// Executing administrator
        #[arg(short, long)]
        from: String,

        /// Transaction id
        #[arg(short, long)]
        tx_id: u64,
    },

    /// Show one transaction
    Show {
        /// Transaction id
        #[arg(short, long)]
        tx_id: u64,
    },

    /// List transactions
    List {
        /// Show only transactions awaiting execution
        #[arg(long)]
        pending: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle init command separately (doesn't need full state)
    if let Commands::Init {
        administrators,
        required,
        owner,
        dev_address,
    } = &cli.command
    {
        let admins: Vec<String> = administrators
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        return cli::cmd_init(&cli.data_dir, admins, *required, owner, dev_address);
    }

    // Encoding needs no platform state either
    if let Commands::Call {
        action: CallCommands::Encode { payload },
    } = &cli.command
    {
        return cli::cmd_call_encode(payload);
    }

    // Initialize application state
    let mut state = AppState::new(cli.data_dir.clone())?;

    // Process commands
    match cli.command {
        Commands::Init { .. } => unreachable!(),
        Commands::Call { .. } => unreachable!(),

        Commands::Board => {
            cli::cmd_board(&state)?;
        }

        Commands::Tx { action } => match action {
            TxCommands::Submit {
                from,
                target,
                value,
                payload,
            } => {
                cli::cmd_tx_submit(&mut state, &from, &target, value, &payload)?;
            }
            TxCommands::Confirm { from, tx_id } => {
                cli::cmd_tx_confirm(&mut state, &from, tx_id)?;
            }
            TxCommands::Execute { from, tx_id } => {
                cli::cmd_tx_execute(&mut state, &from, tx_id)?;
            }
            TxCommands::Show { tx_id } => {
                cli::cmd_tx_show(&state, tx_id)?;
            }
            TxCommands::List { pending } => {
                cli::cmd_tx_list(&state, pending)?;
            }
        },

        Commands::Balance { token, account } => {
            cli::cmd_balance(&state, &token, &account)?;
        }

        Commands::Export { output } => {
            cli::cmd_export(&state, &output)?;
        }

        Commands::Import { input } => {
            cli::cmd_import(&mut state, &input)?;
        }
    }

    Ok(())
}
