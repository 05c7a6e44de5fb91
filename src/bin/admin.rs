//! CLI administration tool for store-locator.
//!
//! Inspects and maintains the store registry without going through the HTTP
//! API, and runs the live postal-code lookup for troubleshooting.
//!
//! # Usage
//!
//! ```bash
//! # List all stores
//! cargo run --bin admin -- stores list
//!
//! # Show one store
//! cargo run --bin admin -- stores show 42
//!
//! # Delete a store (asks for confirmation unless -y)
//! cargo run --bin admin -- stores delete 42
//!
//! # Resolve a postal code through ViaCEP and OpenCage
//! cargo run --bin admin -- lookup 01310-100
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required for `stores` and `db`)
//! - `OPENCAGE_API_KEY` and the other lookup variables (required for `lookup`)

use store_locator::config;
use store_locator::domain::entities::Store;
use store_locator::domain::postal_code::PostalCode;
use store_locator::domain::repositories::StoreRepository;
use store_locator::infrastructure::persistence::PgStoreRepository;
use store_locator::server::build_enricher;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing store-locator.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and maintain stores
    Stores {
        #[command(subcommand)]
        action: StoreAction,
    },

    /// Resolve a postal code to an address and coordinates
    Lookup {
        /// Postal code, with or without hyphen
        cep: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Store subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// List all stores
    List,

    /// Show a single store
    Show { id: i64 },

    /// Delete a store
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stores { action } => {
            let pool = connect().await?;
            handle_store_action(action, &pool).await?
        }
        Commands::Lookup { cep } => lookup(&cep).await?,
        Commands::Db { action } => {
            let pool = connect().await?;
            handle_db_action(action, &pool).await?
        }
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Dispatches store commands.
async fn handle_store_action(action: StoreAction, pool: &PgPool) -> Result<()> {
    let repo = PgStoreRepository::new(Arc::new(pool.clone()));

    match action {
        StoreAction::List => list_stores(&repo).await,
        StoreAction::Show { id } => show_store(&repo, id).await,
        StoreAction::Delete { id, yes } => delete_store(&repo, id, yes).await,
    }
}

/// Lists all stores.
///
/// # Output Format
///
/// ```text
/// 🏬 Stores
///
///   ID   Name                 CEP        City                 Lat / Lng
///   ──────────────────────────────────────────────────────────────────────────────
///   1    Loja Paulista        01310100   São Paulo            -23.5614, -46.6559
/// ```
async fn list_stores(repo: &PgStoreRepository) -> Result<()> {
    println!("{}", "🏬 Stores".bright_blue().bold());
    println!();

    let stores = repo
        .find_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list stores: {}", e))?;

    if stores.is_empty() {
        println!("{}", "  No stores found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<20} {:<10} {:<20} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "CEP".bright_white().bold(),
        "City".bright_white().bold(),
        "Lat / Lng".bright_white().bold()
    );
    println!("  {}", "─".repeat(78).bright_black());

    for store in &stores {
        println!(
            "  {:<4} {:<20} {:<10} {:<20} {}",
            store.id.to_string().bright_black(),
            store.name.cyan(),
            store.postal_code.as_str(),
            store.address.city.as_deref().unwrap_or("-"),
            format!(
                "{:.4}, {:.4}",
                store.coordinate.latitude, store.coordinate.longitude
            )
            .bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        stores.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_store(repo: &PgStoreRepository, id: i64) -> Result<()> {
    let store = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Store not found")?;

    print_store(&store);
    Ok(())
}

/// Deletes a store after confirmation (default: No).
async fn delete_store(repo: &PgStoreRepository, id: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Store".bright_blue().bold());
    println!();

    let store = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Store not found")?;

    print_store(&store);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this store?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete store: {}", e))?
        .context("Store was removed concurrently")?;

    println!();
    println!("{}", "✅ Store deleted".green().bold());
    println!();

    Ok(())
}

fn print_store(store: &Store) {
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    println!("  ID:           {}", store.id.to_string().bright_black());
    println!("  Name:         {}", store.name.cyan());
    println!("  CEP:          {}", store.postal_code);
    println!("  Street:       {}", dash(&store.address.street));
    println!("  Neighborhood: {}", dash(&store.address.neighborhood));
    println!("  City:         {}", dash(&store.address.city));
    println!("  State:        {}", dash(&store.address.state));
    println!(
        "  Coordinates:  {}, {}",
        store.coordinate.latitude, store.coordinate.longitude
    );
    println!(
        "  Updated:      {}",
        store
            .updated_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();
}

/// Runs ViaCEP then OpenCage for a postal code and prints the result.
async fn lookup(cep: &str) -> Result<()> {
    let config = config::load_from_env()?;
    let postal_code = PostalCode::parse(cep).context("Invalid postal code")?;

    println!(
        "{} {}",
        "🔍 Looking up".bright_blue(),
        postal_code.as_str().bright_white().bold()
    );

    let enricher = build_enricher(&config)?;
    let location = enricher
        .enrich(&postal_code)
        .await
        .with_context(|| format!("Lookup failed for {postal_code}"))?;

    let dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

    println!();
    println!("  Street:       {}", dash(location.address.street));
    println!("  Neighborhood: {}", dash(location.address.neighborhood));
    println!("  City:         {}", dash(location.address.city));
    println!("  State:        {}", dash(location.address.state));
    println!(
        "  Coordinates:  {}",
        format!(
            "{}, {}",
            location.coordinate.latitude, location.coordinate.longitude
        )
        .bright_green()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let stores: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
                .fetch_one(pool)
                .await
                .context("stores table missing; start the server once to run migrations")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  Stores: {}", stores.to_string().bright_green().bold());
        }
    }

    Ok(())
}
