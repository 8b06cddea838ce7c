//! Common test utilities and helpers

use mathesis_core::storage::libsql::{ConnectionMode, LibsqlStore};
use mathesis_core::storage::seed::seed_catalog;
use mathesis_core::types::NewUser;

/// Create a file-backed store for testing
///
/// File-backed stores exercise the validation path that `:memory:` skips.
pub async fn create_test_store() -> LibsqlStore {
    let db_path = format!("/tmp/mathesis_test_{}.db", uuid::Uuid::new_v4());
    LibsqlStore::new_with_validation(ConnectionMode::Local(db_path), true)
        .await
        .expect("Failed to create test store")
}

/// Create a store preloaded with the demo catalog
pub async fn create_seeded_store() -> LibsqlStore {
    let store = create_test_store().await;
    seed_catalog(&store).await.expect("Failed to seed catalog");
    store
}

/// Registered account with predictable credentials
pub fn sample_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: Some(format!("{}@example.com", username)),
        password: "correct horse battery staple".to_string(),
        is_guest: false,
    }
}
