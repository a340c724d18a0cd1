//! Database Init Tool
//!
//! Creates the helpdesk schema and bootstraps the default admin account.
//!
//! Usage:
//!   cargo run --bin init-db                      # create schema + admin
//!   cargo run --bin init-db -- --seed            # also load demo data
//!   cargo run --bin init-db -- --reset --seed    # recreate from scratch
//!   cargo run --bin init-db -- --out /path/to/db # custom DB location

use anyhow::{Context, Result};
use clap::Parser;
use helpdesk_backend::config::resolve_data_path;
use helpdesk_backend::store::schema;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tracing::info;

/// Initialize the helpdesk database.
#[derive(Parser, Debug)]
#[command(name = "init-db")]
#[command(about = "Create the helpdesk schema, seed demo data, bootstrap admin")]
struct Cli {
    /// Load demo users, tickets and comments
    #[arg(long)]
    seed: bool,

    /// Delete an existing database file first
    #[arg(long)]
    reset: bool,

    /// Target DB path (overrides HELPDESK_DB_PATH)
    #[arg(long)]
    out: Option<String>,
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();

    let target = resolve_data_path(
        cli.out.or_else(|| std::env::var("HELPDESK_DB_PATH").ok()),
        "helpdesk.db",
    );

    if cli.reset && Path::new(&target).exists() {
        fs::remove_file(&target).with_context(|| format!("Failed to delete {}", target))?;
        info!("🗑️  Deleted existing database: {}", target);
    }

    if let Some(parent) = Path::new(&target).parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(&target).with_context(|| format!("Failed to open {}", target))?;

    schema::init_schema(&conn)?;
    info!("✅ Schema loaded into {}", target);

    if cli.seed {
        schema::seed_demo_data(&conn)?;
    } else {
        info!("ℹ️  Seed skipped (use --seed to load demo data)");
    }

    schema::ensure_admin(&conn)?;

    info!("🏁 Initialization complete");
    Ok(())
}
