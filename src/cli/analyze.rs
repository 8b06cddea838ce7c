//! Learning analytics command
//!
//! Runs the full pipeline for one user and prints the emotion pattern,
//! effectiveness score, state classification, and recommendation bundle.

use mathesis_core::analytics::RecommendationEngine;
use mathesis_core::error::Result;
use mathesis_core::storage::LearningStore;
use mathesis_core::types::UserId;
use std::sync::Arc;
use tracing::debug;

use super::helpers::{get_db_path, open_store};

/// Handle analytics command
pub async fn handle(
    user: i64,
    duration_minutes: u32,
    format: String,
    global_db_path: Option<String>,
) -> Result<()> {
    let db_path = get_db_path(global_db_path)?;
    debug!("Using database: {}", db_path);

    let store = open_store(&db_path, false).await?;
    let user_id = UserId(user);
    let account = store.user_by_id(user_id).await?;

    let store: Arc<dyn LearningStore> = Arc::new(store);
    let observations = store.recent_emotions(user_id).await?;

    let engine = RecommendationEngine::new(store);
    let state = engine.learning_state(user_id, duration_minutes).await?;
    let plan = engine.recommend(user_id).await?;

    if format == "json" {
        println!(
            "{}",
            serde_json::json!({
                "user": {
                    "id": account.id,
                    "username": account.username,
                },
                "observations": observations.len(),
                "state": state,
                "plan": plan,
            })
        );
    } else {
        println!(
            "Learning analytics for {} (user {})",
            account.username, account.id
        );
        println!();
        println!("Observations: {}", observations.len());
        println!("State:        {}", state);
        println!();
        println!("Pattern");
        println!("  Dominant:  {}", plan.pattern.dominant);
        println!("  Stability: {:.2}", plan.pattern.stability);
        println!("  Trend:     {}", plan.pattern.trend);
        println!();
        println!("Effectiveness: {:.1}/100", plan.effectiveness);
        println!();
        println!("Recommendation");
        println!("  Pace:           {}", plan.recommendation.learning_pace);
        println!("  Format:         {}", plan.recommendation.content_format);
        println!(
            "  Break interval: {} min",
            plan.recommendation.break_interval_minutes
        );
        if plan.recommendation.suggested_activities.is_empty() {
            println!("  Activities:     (none)");
        } else {
            println!("  Activities:");
            for activity in &plan.recommendation.suggested_activities {
                println!("    - {}", activity);
            }
        }
    }

    Ok(())
}
