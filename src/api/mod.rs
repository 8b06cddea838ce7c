//! HTTP API for the learning platform
//!
//! Provides:
//! - Signup, login, and logout with opaque bearer tokens
//! - Course catalog and quiz bank access
//! - Emotion and progress recording
//! - Recommendation and learning-state queries

pub mod server;
pub mod sessions;

pub use server::{ApiServer, ApiServerConfig};
pub use sessions::SessionManager;
