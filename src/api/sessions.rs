//! In-memory session registry
//!
//! Opaque bearer tokens mapped to user ids. Sessions live for the process
//! lifetime and logout removes them; there is no expiry and no persistence.

use crate::types::UserId;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Session registry shared across request handlers
#[derive(Debug, Default)]
pub struct SessionManager {
    tokens: RwLock<HashMap<String, UserId>>,
}

impl SessionManager {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for the given user
    ///
    /// A user may hold several tokens at once (one per device or test).
    pub async fn create(&self, user_id: UserId) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.write().await.insert(token.clone(), user_id);
        debug!(%user_id, "session created");
        token
    }

    /// Resolve a token to its user, if the session exists
    pub async fn resolve(&self, token: &str) -> Option<UserId> {
        self.tokens.read().await.get(token).copied()
    }

    /// Drop a session; returns whether the token was known
    pub async fn revoke(&self, token: &str) -> bool {
        let removed = self.tokens.write().await.remove(token).is_some();
        if removed {
            debug!("session revoked");
        }
        removed
    }

    /// Number of live sessions
    pub async fn active_count(&self) -> usize {
        self.tokens.read().await.len()
    }
}
