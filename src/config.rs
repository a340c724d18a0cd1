//! Process Configuration
//! Mission: Read all environment configuration once at startup

use anyhow::{bail, Result};
use std::env;
use std::path::Path;

/// Default signing secret for local development.
/// Rotate via HELPDESK_SECRET in any real deployment: every issued token
/// is invalidated when the secret changes.
const DEV_SECRET: &str = "cambiame_por_una_clave_segura";

/// Immutable process-wide configuration.
///
/// Loaded once in `main` and passed explicitly into the pieces that need it,
/// so the signing secret and database location stay injectable in tests.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub jwt_secret: String,
    pub bind_addr: String,
}

impl Config {
    /// Build configuration from the environment.
    ///
    /// Fails fast when the database file does not exist — the schema is
    /// owned by the `init-db` binary, not the server.
    pub fn from_env() -> Result<Self> {
        let db_path = resolve_data_path(env::var("HELPDESK_DB_PATH").ok(), "helpdesk.db");

        if !Path::new(&db_path).exists() {
            bail!(
                "database not found at {}. Run `init-db --seed` first.",
                db_path
            );
        }

        let jwt_secret = env::var("HELPDESK_SECRET").unwrap_or_else(|_| DEV_SECRET.to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        Ok(Self {
            db_path,
            jwt_secret,
            bind_addr,
        })
    }
}

/// Resolve a configured path, defaulting relative paths against the crate
/// directory instead of the caller's cwd.
pub fn resolve_data_path(configured: Option<String>, default_name: &str) -> String {
    let raw = configured.unwrap_or_else(|| default_name.to_string());
    let p = Path::new(&raw);
    if p.is_absolute() {
        return raw;
    }

    let base = Path::new(env!("CARGO_MANIFEST_DIR"));
    base.join(p).to_string_lossy().to_string()
}
