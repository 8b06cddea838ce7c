//! Shared helper functions for CLI commands
//!
//! Database path resolution and store opening, used across all subcommands.

use mathesis_core::config::MathesisConfig;
use mathesis_core::error::Result;
use mathesis_core::storage::libsql::{ConnectionMode, LibsqlStore};
use std::path::PathBuf;

/// Resolve the database path: CLI flag, then env var, then config file,
/// then the platform default
pub fn get_db_path(cli_path: Option<String>) -> Result<String> {
    match cli_path {
        Some(path) => Ok(path),
        None => Ok(MathesisConfig::load()?.db_path),
    }
}

/// Open the store at the given path
///
/// `:memory:` opens a throwaway in-memory database. With
/// `create_if_missing` the parent directory is created too, so a first
/// run against the default path works without a separate `init`.
pub async fn open_store(db_path: &str, create_if_missing: bool) -> Result<LibsqlStore> {
    if db_path == ":memory:" {
        return LibsqlStore::from_path(db_path).await;
    }

    if create_if_missing {
        if let Some(parent) = PathBuf::from(db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    LibsqlStore::new_with_validation(
        ConnectionMode::Local(db_path.to_string()),
        create_if_missing,
    )
    .await
}
