//! Composite learning effectiveness score
//!
//! Combines a pattern summary with a topic-completion snapshot into a single
//! score on a 0 to 100 scale:
//!
//! ```text
//! score = 70 + stability * 10 + trend_bonus + completion_ratio * 20
//! ```
//!
//! where trend_bonus is +10 for an improving trend, -10 for declining, and 0
//! otherwise, and completion_ratio is completed over total topics. The sum is
//! clamped to [0, 100] after all terms are applied.

use crate::error::{MathesisError, Result};
use crate::types::{EmotionPattern, ProgressSnapshot};
use tracing::debug;

/// Baseline score before any adjustment
const BASE_SCORE: f64 = 70.0;

/// Maximum contribution of the stability term
const STABILITY_WEIGHT: f64 = 10.0;

/// Maximum contribution of the completion term
const PROGRESS_WEIGHT: f64 = 20.0;

/// Score a pattern and progress snapshot
///
/// Fails with [`MathesisError::EmptyCurriculum`] when the snapshot reports
/// zero total topics. That is a caller precondition violation, not a
/// zero-progress learner, and defaulting the ratio would silently misreport
/// every downstream recommendation.
pub fn score_effectiveness(pattern: &EmotionPattern, progress: &ProgressSnapshot) -> Result<f64> {
    if progress.total_topics == 0 {
        return Err(MathesisError::EmptyCurriculum);
    }

    let completion_ratio = f64::from(progress.completed_topics) / f64::from(progress.total_topics);

    let score = BASE_SCORE
        + pattern.stability * STABILITY_WEIGHT
        + pattern.trend.bonus()
        + completion_ratio * PROGRESS_WEIGHT;
    let score = score.clamp(0.0, 100.0);

    debug!(
        score,
        stability = pattern.stability,
        trend = %pattern.trend,
        completion_ratio,
        "scored learning effectiveness"
    );

    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EmotionLabel, Trend};
    use proptest::prelude::*;

    fn pattern(stability: f64, trend: Trend) -> EmotionPattern {
        EmotionPattern {
            dominant: EmotionLabel::from("focused"),
            stability,
            trend,
        }
    }

    #[test]
    fn test_baseline_score() {
        // Zero stability, stable trend, zero completion: just the baseline
        let score = score_effectiveness(
            &pattern(0.0, Trend::Stable),
            &ProgressSnapshot {
                completed_topics: 0,
                total_topics: 10,
            },
        )
        .unwrap();
        assert_eq!(score, 70.0);
    }

    #[test]
    fn test_all_terms_additive() {
        // 70 + 0.5*10 + 10 + 0.5*20 = 95
        let score = score_effectiveness(
            &pattern(0.5, Trend::Improving),
            &ProgressSnapshot {
                completed_topics: 5,
                total_topics: 10,
            },
        )
        .unwrap();
        assert!((score - 95.0).abs() < 1e-12);
    }

    #[test]
    fn test_declining_trend_subtracts() {
        // 70 + 0 - 10 + 0 = 60
        let score = score_effectiveness(
            &pattern(0.0, Trend::Declining),
            &ProgressSnapshot {
                completed_topics: 0,
                total_topics: 4,
            },
        )
        .unwrap();
        assert_eq!(score, 60.0);
    }

    #[test]
    fn test_upper_clamp() {
        // 70 + 10 + 10 + 20 = 110, clamped to 100
        let score = score_effectiveness(
            &pattern(1.0, Trend::Improving),
            &ProgressSnapshot {
                completed_topics: 10,
                total_topics: 10,
            },
        )
        .unwrap();
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_neutral_trend_contributes_nothing() {
        let stable = score_effectiveness(
            &pattern(0.3, Trend::Stable),
            &ProgressSnapshot {
                completed_topics: 1,
                total_topics: 4,
            },
        )
        .unwrap();
        let neutral = score_effectiveness(
            &pattern(0.3, Trend::Neutral),
            &ProgressSnapshot {
                completed_topics: 1,
                total_topics: 4,
            },
        )
        .unwrap();
        assert_eq!(stable, neutral);
    }

    #[test]
    fn test_zero_total_topics_rejected() {
        let result = score_effectiveness(
            &pattern(0.5, Trend::Improving),
            &ProgressSnapshot {
                completed_topics: 0,
                total_topics: 0,
            },
        );
        assert!(matches!(result, Err(MathesisError::EmptyCurriculum)));
    }

    proptest! {
        #[test]
        fn prop_score_within_bounds(
            stability in 0.0f64..1.0,
            completed in 0u32..100,
            total in 1u32..100,
        ) {
            let completed = completed.min(total);
            for trend in [Trend::Improving, Trend::Declining, Trend::Stable, Trend::Neutral] {
                let score = score_effectiveness(
                    &pattern(stability, trend),
                    &ProgressSnapshot { completed_topics: completed, total_topics: total },
                ).unwrap();
                prop_assert!((0.0..=100.0).contains(&score));
            }
        }

        #[test]
        fn prop_more_completion_never_lowers_score(
            stability in 0.0f64..1.0,
            total in 2u32..50,
        ) {
            let low = score_effectiveness(
                &pattern(stability, Trend::Stable),
                &ProgressSnapshot { completed_topics: 0, total_topics: total },
            ).unwrap();
            let high = score_effectiveness(
                &pattern(stability, Trend::Stable),
                &ProgressSnapshot { completed_topics: total, total_topics: total },
            ).unwrap();
            prop_assert!(high >= low);
        }
    }
}
