//! AryCar CLI - database migrations, catalog seeding and queue inspection.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! arycar migrate
//!
//! # Load the service catalog (and exclusion groups) from YAML
//! arycar seed services --file crates/cli/seed/services.yaml
//!
//! # Replace the whole catalog
//! arycar seed services --replace
//!
//! # Show the queue, optionally filtered by status
//! arycar orders list --status waiting
//! ```
//!
//! Every command reads `ARYCAR_DATABASE_URL` (falling back to
//! `DATABASE_URL`), loading `.env` when present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "arycar")]
#[command(author, version, about = "AryCar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Inspect service orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert the service catalog and exclusion groups from a YAML file
    Services {
        /// Path to the catalog file
        #[arg(short, long, default_value = commands::seed::DEFAULT_SERVICES_FILE)]
        file: String,

        /// Delete every service before seeding
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List {
        /// `waiting`, `in_progress`, `done`, `delivered` or `all`
        #[arg(short, long, default_value = "all")]
        status: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Services { file, replace } => {
                commands::seed::services(&file, replace).await?;
            }
        },
        Commands::Orders { action } => match action {
            OrdersAction::List { status } => commands::orders::list(&status).await?,
        },
    }
    Ok(())
}
