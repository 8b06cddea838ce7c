//! Mathesis - Emotion-Aware Personalized Learning Platform
//!
//! A Rust learning platform core that provides:
//! - Weighted emotion pattern analysis over facial-expression label streams
//! - Learning effectiveness scoring and state classification
//! - Adaptive pace, format, and activity recommendations
//! - Course catalog, quiz banks, and per-topic progress tracking
//!
//! # Architecture
//!
//! The system is organized into several layers:
//! - **Types**: Core data structures (EmotionLabel, Course, LearningPlan, etc.)
//! - **Analytics**: Pattern analysis, scoring, classification, recommendation
//! - **Storage**: libsql persistence behind the `LearningStore` trait
//! - **Api**: JSON HTTP server with bearer-token sessions
//!
//! # Example
//!
//! ```ignore
//! use mathesis_core::analytics::RecommendationEngine;
//! use mathesis_core::storage::libsql::{ConnectionMode, LibsqlStore};
//! use mathesis_core::types::UserId;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = LibsqlStore::new(ConnectionMode::Local("mathesis.db".into())).await?;
//!     let engine = RecommendationEngine::new(Arc::new(store));
//!
//!     let plan = engine.recommend(UserId(1)).await?;
//!     println!("pace: {}", plan.recommendation.learning_pace);
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use analytics::RecommendationEngine;
pub use config::MathesisConfig;
pub use error::{MathesisError, Result};
pub use storage::libsql::{ConnectionMode, LibsqlStore};
pub use storage::LearningStore;
pub use types::{
    Course, CourseId, EmotionLabel, EmotionObservation, EmotionPattern, LearningPlan,
    LearningState, ProgressSnapshot, Recommendation, Trend, UserAccount, UserId,
};
