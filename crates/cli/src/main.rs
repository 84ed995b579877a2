//! Registration CLI - schema and reference data management.
//!
//! # Usage
//!
//! ```bash
//! # Create the tables
//! reg-cli db create
//!
//! # Create the tables (if needed) and seed states and countries
//! reg-cli db seed
//!
//! # Drop every registration table
//! reg-cli db drop
//!
//! # Drop, recreate, and reseed
//! reg-cli db reset
//! ```
//!
//! The database is taken from `REGISTRATION_DATABASE_URL` (or `DATABASE_URL`),
//! the same variable the web server reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "reg-cli")]
#[command(author, version, about = "Registration demo CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the registration database
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum DbAction {
    /// Create every table that does not exist yet
    Create,
    /// Create the tables if needed and seed the reference data
    Seed,
    /// Drop every registration table
    Drop,
    /// Drop, recreate, and reseed
    Reset,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::db::DbCommandError> {
    match cli.command {
        Commands::Db { action } => match action {
            DbAction::Create => commands::db::create().await,
            DbAction::Seed => commands::db::seed().await,
            DbAction::Drop => commands::db::drop().await,
            DbAction::Reset => commands::db::reset().await,
        },
    }
}
