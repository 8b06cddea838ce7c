//! HTTP API server command

use mathesis_core::api::{ApiServer, ApiServerConfig};
use mathesis_core::config::MathesisConfig;
use mathesis_core::error::Result;
use mathesis_core::storage::LearningStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

use super::helpers::open_store;

/// Handle HTTP API server startup command
pub async fn handle(addr: Option<String>, global_db_path: Option<String>) -> Result<()> {
    debug!("Starting HTTP API server...");

    let config = MathesisConfig::load()?;

    let socket_addr: SocketAddr = match addr {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", raw, e))?,
        None => config.api_addr,
    };

    let db_path = global_db_path.unwrap_or(config.db_path);
    debug!("Using database: {}", db_path);
    debug!("Emotion window: {} observations", config.emotion_window);

    // Serving implies initializing on first run
    let mut store = open_store(&db_path, true).await?;
    store.set_emotion_window(config.emotion_window);
    let store: Arc<dyn LearningStore> = Arc::new(store);

    println!();
    println!("🎓 Mathesis API Server");
    println!("   Emotion-aware personalized learning");
    println!();
    println!("   Address:  http://{}", socket_addr);
    println!("   Database: {}", db_path);
    println!();
    println!("   Endpoints:");
    println!("   • POST /auth/signup - Create an account (or guest)");
    println!("   • POST /auth/login - Exchange credentials for a token");
    println!("   • POST /auth/logout - Revoke the current token");
    println!("   • GET  /dashboard - Profile, catalog, and progress");
    println!("   • GET  /courses - Course catalog");
    println!("   • POST /emotions - Record an emotion observation");
    println!("   • POST /progress - Record topic progress");
    println!("   • GET  /recommendations - Learning plan for the user");
    println!("   • GET  /learning-state - Current state classification");
    println!("   • GET  /health - Health check");
    println!();

    let server_config = ApiServerConfig { addr: socket_addr };
    let server = ApiServer::new(server_config, store);

    // Run server with graceful shutdown on signals
    tokio::select! {
        result = server.serve() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping API server gracefully...");
        }
    }

    info!("API server shut down complete");
    Ok(())
}
