//! Coarse learning-state classification
//!
//! Labels a whole observation window with one of six states using unweighted
//! frequency counts, unlike the recency-weighted pattern analysis. Decision
//! cascade, first match wins:
//!
//! 1. confusion ratio strictly above 0.5 yields needs_help
//! 2. engagement ratio strictly above 0.6 yields good_progress
//! 3. dominant label in the positive set yields engaged
//! 4. dominant label in the negative set yields struggling
//! 5. otherwise neutral
//!
//! The dominant label here is the unweighted mode with first-seen tie-break.
//! Both ratio cutoffs are strict, so a window that is exactly half confusion
//! falls through to the next check.

use crate::types::{EmotionLabel, EmotionObservation, LearningState};
use tracing::debug;

/// Confusion share strictly above this yields needs_help
const CONFUSION_CUTOFF: f64 = 0.5;

/// Engagement share strictly above this yields good_progress
const ENGAGEMENT_CUTOFF: f64 = 0.6;

/// Classify a window of observations into a learning state
///
/// `_duration_minutes` is part of the contract but never consulted; the
/// classification depends only on the observations.
pub fn classify_state(
    observations: &[EmotionObservation],
    _duration_minutes: u32,
) -> LearningState {
    if observations.is_empty() {
        return LearningState::Unknown;
    }

    let total = observations.len() as f64;
    let confusion = observations
        .iter()
        .filter(|o| o.emotion.is_confusion())
        .count() as f64;
    let engagement = observations
        .iter()
        .filter(|o| o.emotion.is_engagement())
        .count() as f64;

    let state = if confusion / total > CONFUSION_CUTOFF {
        LearningState::NeedsHelp
    } else if engagement / total > ENGAGEMENT_CUTOFF {
        LearningState::GoodProgress
    } else {
        let dominant = mode_label(observations);
        if dominant.is_positive() {
            LearningState::Engaged
        } else if dominant.is_negative() {
            LearningState::Struggling
        } else {
            LearningState::Neutral
        }
    };

    debug!(
        state = %state,
        window = observations.len(),
        confusion_ratio = confusion / total,
        engagement_ratio = engagement / total,
        "classified learning state"
    );

    state
}

/// Unweighted mode of the window, ties resolved to the first-seen label
fn mode_label(observations: &[EmotionObservation]) -> EmotionLabel {
    let mut counts: Vec<(&EmotionLabel, usize)> = Vec::new();
    for obs in observations {
        match counts.iter_mut().find(|(label, _)| *label == &obs.emotion) {
            Some((_, count)) => *count += 1,
            None => counts.push((&obs.emotion, 1)),
        }
    }

    let mut best = &counts[0];
    for entry in &counts[1..] {
        if entry.1 > best.1 {
            best = entry;
        }
    }
    best.0.clone()
}
