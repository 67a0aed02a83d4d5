//! Saffron Lane CLI - session store migrations and storefront tooling.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table
//! saffron-cli migrate
//!
//! # Which seasonal theme each country sees on a date
//! saffron-cli themes --date 2026-11-01
//!
//! # List supported countries
//! saffron-cli countries
//!
//! # Generate a value for STOREFRONT_CART_KEY
//! saffron-cli cart-key
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "saffron-cli")]
#[command(version, about = "Saffron Lane storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the `PostgreSQL` session table
    Migrate,
    /// Show the active seasonal theme per country
    Themes {
        /// Date to evaluate (defaults to today, UTC)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Only this country slug (e.g. `in`)
        #[arg(short, long)]
        country: Option<String>,

        /// List the whole theme table instead
        #[arg(long)]
        all: bool,
    },
    /// List supported countries
    Countries,
    /// Generate a random cart snapshot key
    CartKey,
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
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Themes { date, country, all } => {
            if all {
                commands::themes::table();
            } else {
                commands::themes::active(date, country.as_deref())?;
            }
        }
        Commands::Countries => commands::themes::countries(),
        Commands::CartKey => commands::keys::cart_key()?,
    }
    Ok(())
}
