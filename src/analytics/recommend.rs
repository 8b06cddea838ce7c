//! Adaptive recommendation selection
//!
//! Maps an effectiveness score onto one of three discrete bundles:
//!
//! - below 50: reduced pace, visual content, 20 minute breaks, remedial
//!   activity list
//! - above 80: accelerated pace, advanced content, 45 minute breaks,
//!   stretch activity list
//! - 50 to 80 inclusive: the default bundle, unmodified
//!
//! Both cutoffs are strict comparisons; a score of exactly 50 or exactly 80
//! keeps the default bundle. Selection is stateless and idempotent, derived
//! fresh on every call.
//!
//! [`RecommendationEngine`] wires the pure pipeline to an injected store:
//! it fetches the recent observation window and progress snapshot, then runs
//! pattern analysis, scoring, and bundle selection.

use crate::analytics::{
    analyze_pattern, classify_state, score_effectiveness, DEFAULT_TIME_WINDOW_MINUTES,
};
use crate::error::Result;
use crate::storage::LearningStore;
use crate::types::{
    ContentFormat, EmotionLabel, EmotionObservation, LearningPace, LearningPlan, LearningState,
    ProgressSnapshot, Recommendation, UserId,
};
use std::sync::Arc;
use tracing::debug;

/// Scores strictly below this get the remedial bundle
const LOW_SCORE_CUTOFF: f64 = 50.0;

/// Scores strictly above this get the stretch bundle
const HIGH_SCORE_CUTOFF: f64 = 80.0;

/// Select the recommendation bundle for an effectiveness score
pub fn recommend_for_score(score: f64) -> Recommendation {
    if score < LOW_SCORE_CUTOFF {
        Recommendation {
            learning_pace: LearningPace::Reduced,
            content_format: ContentFormat::Visual,
            break_interval_minutes: 20,
            suggested_activities: vec![
                "Review fundamental concepts".to_string(),
                "Try interactive exercises".to_string(),
                "Watch video tutorials".to_string(),
            ],
        }
    } else if score > HIGH_SCORE_CUTOFF {
        Recommendation {
            learning_pace: LearningPace::Accelerated,
            content_format: ContentFormat::Advanced,
            break_interval_minutes: 45,
            suggested_activities: vec![
                "Tackle challenging problems".to_string(),
                "Explore advanced topics".to_string(),
                "Help peers with questions".to_string(),
            ],
        }
    } else {
        Recommendation::default()
    }
}

/// Run the full pipeline over an in-memory window and snapshot
///
/// Pattern, score, and bundle in one pass. Fails only on a zero-topic
/// snapshot, which [`score_effectiveness`] rejects.
pub fn build_learning_plan(
    observations: &[EmotionObservation],
    progress: &ProgressSnapshot,
) -> Result<LearningPlan> {
    let labels: Vec<EmotionLabel> = observations.iter().map(|o| o.emotion.clone()).collect();
    let pattern = analyze_pattern(&labels, DEFAULT_TIME_WINDOW_MINUTES);
    let effectiveness = score_effectiveness(&pattern, progress)?;
    let recommendation = recommend_for_score(effectiveness);

    Ok(LearningPlan {
        pattern,
        effectiveness,
        recommendation,
    })
}

/// Recommendation pipeline bound to a store
///
/// Holds the injected store as a trait object; every call fetches fresh
/// inputs, so the engine itself carries no per-user state and is safe to
/// share across request handlers.
pub struct RecommendationEngine {
    store: Arc<dyn LearningStore>,
}

impl RecommendationEngine {
    /// Create an engine over the given store
    pub fn new(store: Arc<dyn LearningStore>) -> Self {
        Self { store }
    }

    /// Build a learning plan for a user from their stored history
    ///
    /// The store bounds the observation window; no additional filtering
    /// happens here.
    pub async fn recommend(&self, user_id: UserId) -> Result<LearningPlan> {
        let observations = self.store.recent_emotions(user_id).await?;
        let progress = self.store.progress_snapshot(user_id).await?;

        debug!(
            %user_id,
            observations = observations.len(),
            completed = progress.completed_topics,
            total = progress.total_topics,
            "building learning plan"
        );

        build_learning_plan(&observations, &progress)
    }

    /// Classify the user's current learning state from their stored history
    pub async fn learning_state(
        &self,
        user_id: UserId,
        duration_minutes: u32,
    ) -> Result<LearningState> {
        let observations = self.store.recent_emotions(user_id).await?;
        Ok(classify_state(&observations, duration_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockLearningStore;
    use crate::types::Trend;
    use chrono::Utc;

    #[test]
    fn test_low_score_bundle() {
        let rec = recommend_for_score(45.0);
        assert_eq!(rec.learning_pace, LearningPace::Reduced);
        assert_eq!(rec.content_format, ContentFormat::Visual);
        assert_eq!(rec.break_interval_minutes, 20);
        assert_eq!(
            rec.suggested_activities,
            vec![
                "Review fundamental concepts",
                "Try interactive exercises",
                "Watch video tutorials",
            ]
        );
    }

    #[test]
    fn test_high_score_bundle() {
        let rec = recommend_for_score(85.0);
        assert_eq!(rec.learning_pace, LearningPace::Accelerated);
        assert_eq!(rec.content_format, ContentFormat::Advanced);
        assert_eq!(rec.break_interval_minutes, 45);
        assert_eq!(
            rec.suggested_activities,
            vec![
                "Tackle challenging problems",
                "Explore advanced topics",
                "Help peers with questions",
            ]
        );
    }

    #[test]
    fn test_mid_range_keeps_default() {
        let rec = recommend_for_score(65.0);
        assert_eq!(rec, Recommendation::default());
        assert!(rec.suggested_activities.is_empty());
    }

    #[test]
    fn test_cutoffs_are_strict() {
        // Exactly 50 and exactly 80 both stay on the default bundle
        assert_eq!(recommend_for_score(50.0), Recommendation::default());
        assert_eq!(recommend_for_score(80.0), Recommendation::default());

        assert_eq!(
            recommend_for_score(49.999).learning_pace,
            LearningPace::Reduced
        );
        assert_eq!(
            recommend_for_score(80.001).learning_pace,
            LearningPace::Accelerated
        );
    }

    #[test]
    fn test_plan_from_empty_window() {
        // Sentinel pattern scores 70 + completion only
        let plan = build_learning_plan(
            &[],
            &ProgressSnapshot {
                completed_topics: 0,
                total_topics: 10,
            },
        )
        .unwrap();
        assert_eq!(plan.pattern.dominant, EmotionLabel::unknown());
        assert_eq!(plan.pattern.trend, Trend::Neutral);
        assert_eq!(plan.effectiveness, 70.0);
        assert_eq!(plan.recommendation, Recommendation::default());
    }

    #[test]
    fn test_plan_zero_topics_propagates_error() {
        let result = build_learning_plan(
            &[],
            &ProgressSnapshot {
                completed_topics: 0,
                total_topics: 0,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_is_deterministic() {
        let obs: Vec<EmotionObservation> = ["focused", "happy", "focused"]
            .iter()
            .map(|l| EmotionObservation {
                emotion: EmotionLabel::from(*l),
                timestamp: Utc::now(),
            })
            .collect();
        let progress = ProgressSnapshot {
            completed_topics: 3,
            total_topics: 12,
        };

        let first = build_learning_plan(&obs, &progress).unwrap();
        let second = build_learning_plan(&obs, &progress).unwrap();
        assert_eq!(first, second);
    }

    fn observations(raw: &[&str]) -> Vec<EmotionObservation> {
        raw.iter()
            .map(|l| EmotionObservation {
                emotion: EmotionLabel::from(*l),
                timestamp: Utc::now(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_engine_fetches_and_scores() {
        let mut store = MockLearningStore::new();
        store
            .expect_recent_emotions()
            .returning(|_| Ok(observations(&["focused", "focused", "focused"])));
        store.expect_progress_snapshot().returning(|_| {
            Ok(ProgressSnapshot {
                completed_topics: 10,
                total_topics: 10,
            })
        });

        let engine = RecommendationEngine::new(Arc::new(store));
        let plan = engine.recommend(UserId(1)).await.unwrap();

        // stability 1 - 1/3, trend improving, full completion:
        // 70 + 6.67 + 10 + 20 clamps to 100
        assert_eq!(plan.effectiveness, 100.0);
        assert_eq!(plan.recommendation.learning_pace, LearningPace::Accelerated);
        assert_eq!(plan.pattern.dominant.as_str(), "focused");
    }

    #[tokio::test]
    async fn test_engine_empty_history_is_mid_range() {
        let mut store = MockLearningStore::new();
        store.expect_recent_emotions().returning(|_| Ok(Vec::new()));
        store.expect_progress_snapshot().returning(|_| {
            Ok(ProgressSnapshot {
                completed_topics: 2,
                total_topics: 8,
            })
        });

        let engine = RecommendationEngine::new(Arc::new(store));
        let plan = engine.recommend(UserId(7)).await.unwrap();

        // 70 + 0 + 0 + 5 = 75, mid-range
        assert_eq!(plan.effectiveness, 75.0);
        assert_eq!(plan.recommendation, Recommendation::default());
    }

    #[tokio::test]
    async fn test_engine_learning_state() {
        let mut store = MockLearningStore::new();
        store
            .expect_recent_emotions()
            .returning(|_| Ok(observations(&["confused", "very_confused", "confused"])));

        let engine = RecommendationEngine::new(Arc::new(store));
        let state = engine.learning_state(UserId(3), 30).await.unwrap();
        assert_eq!(state, LearningState::NeedsHelp);
    }
}
