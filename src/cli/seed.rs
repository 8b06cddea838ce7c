//! Demo catalog seeding command

use mathesis_core::error::Result;
use mathesis_core::storage::seed::seed_catalog;
use tracing::debug;

use super::helpers::{get_db_path, open_store};

/// Handle demo catalog seeding command
///
/// Reseeding replaces the catalog in place; user accounts and recorded
/// emotions are left untouched.
pub async fn handle(global_db_path: Option<String>) -> Result<()> {
    let db_path = get_db_path(global_db_path)?;
    debug!("Seeding demo catalog in {}", db_path);

    let store = open_store(&db_path, true).await?;
    seed_catalog(&store).await?;

    println!("✓ Demo catalog seeded: {}", db_path);
    Ok(())
}
