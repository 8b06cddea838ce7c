//! Database initialization command

use mathesis_core::error::Result;
use mathesis_core::storage::seed::seed_catalog;
use tracing::debug;

use super::helpers::{get_db_path, open_store};

/// Handle database initialization command
pub async fn handle(
    database: Option<String>,
    global_db_path: Option<String>,
    seed: bool,
) -> Result<()> {
    debug!("Initializing database...");

    let db_path = get_db_path(database.or(global_db_path))?;
    debug!("Database path: {}", db_path);

    // Init explicitly creates the database if missing
    let store = open_store(&db_path, true).await?;
    println!("✓ Database initialized: {}", db_path);

    if seed {
        seed_catalog(&store).await?;
        println!("✓ Demo catalog seeded");
    }

    Ok(())
}
