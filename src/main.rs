//! Quorum Ledger CLI
//!
//! Runs scripted vault and ledger scenarios and prints their event traces.

use clap::{Parser, Subcommand};
use quorum_ledger::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quorum-ledger")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Threshold vault and quota-governed issuance ledger", long_about = None)]
struct Cli {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the n-of-m vault scenario
    Vault {
        /// Number of owners (m), overrides the settings file
        #[arg(long)]
        owners: Option<usize>,

        /// Confirmations required (n), overrides the settings file
        #[arg(long)]
        required: Option<usize>,

        /// Native units deposited into the vault
        #[arg(long, default_value = "1000000")]
        funding: u128,

        /// Value of the transfer pushed through the vault
        #[arg(long, default_value = "100000")]
        value: u128,
    },

    /// Run the issuance ledger scenario
    Token {
        /// Initial daily quota, overrides the settings file
        #[arg(long)]
        quota: Option<u128>,
    },

    /// Print the effective settings
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = cli::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Vault {
            owners,
            required,
            funding,
            value,
        } => {
            if let Some(owners) = owners {
                settings.vault.owners.clear();
                settings.vault.owner_count = owners;
            }
            if let Some(required) = required {
                settings.vault.required = required;
            }
            cli::cmd_vault(&settings.vault, funding, value)?;
        }

        Commands::Token { quota } => {
            if let Some(quota) = quota {
                settings.ledger.daily_quota = quota;
            }
            cli::cmd_token(&settings.ledger)?;
        }

        Commands::Config => {
            cli::cmd_show_config(&settings)?;
        }
    }

    Ok(())
}
