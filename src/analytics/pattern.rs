//! Emotion pattern analysis over an ordered label sequence
//!
//! Summarizes a chronological sequence of emotion labels into a dominant
//! label, a stability measure, and a short-window trend:
//!
//! 1. Recency weights form a linear ramp from 0.5 (oldest) to 1.0 (newest),
//!    endpoints inclusive. A single observation gets weight 0.5.
//! 2. Each label accumulates the weights of its occurrences; the dominant
//!    label is the one with the highest total. Ties go to the label that
//!    appeared first in the sequence.
//! 3. Stability is `1 - distinct_labels / n`: all-distinct labels give 0, a
//!    long run of one repeated label approaches 1.
//! 4. Trend looks at only the last five labels (fewer if the sequence is
//!    shorter) and compares positive against negative valence counts.
//!
//! An empty sequence yields the sentinel pattern: dominant "unknown",
//! stability 0, trend neutral.

use crate::types::{EmotionLabel, EmotionPattern, Trend};
use tracing::debug;

/// Labels considered by the trend calculation
const TREND_WINDOW: usize = 5;

/// Weight assigned to the oldest label in the ramp
const RAMP_START: f64 = 0.5;

/// Weight assigned to the newest label in the ramp
const RAMP_END: f64 = 1.0;

/// Summarize a label sequence into a pattern
///
/// The slice must be in chronological order, oldest first; position in the
/// slice determines recency weight. `_time_window_minutes` is part of the
/// contract but does not filter or rescale anything; callers bound the
/// window before calling.
pub fn analyze_pattern(labels: &[EmotionLabel], _time_window_minutes: u32) -> EmotionPattern {
    if labels.is_empty() {
        debug!("empty label sequence, returning sentinel pattern");
        return EmotionPattern::sentinel();
    }

    let dominant = dominant_label(labels);
    let stability = stability(labels);
    let trend = trend(labels);

    debug!(
        dominant = %dominant,
        stability,
        trend = %trend,
        window = labels.len(),
        "analyzed emotion pattern"
    );

    EmotionPattern {
        dominant,
        stability,
        trend,
    }
}

/// Evenly spaced recency weights from `RAMP_START` to `RAMP_END` inclusive
///
/// A single-element ramp is `[RAMP_START]`: one observation carries the
/// low-confidence end of the ramp, not full weight.
fn recency_weights(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![RAMP_START],
        _ => {
            let step = (RAMP_END - RAMP_START) / (n - 1) as f64;
            (0..n).map(|i| RAMP_START + step * i as f64).collect()
        }
    }
}

/// Label with the highest accumulated recency weight
///
/// Accumulation preserves first-appearance order so that an exact weight tie
/// resolves to the label seen earliest in the sequence.
fn dominant_label(labels: &[EmotionLabel]) -> EmotionLabel {
    let weights = recency_weights(labels.len());

    // Insertion-ordered accumulation; a HashMap would make tie-breaks
    // nondeterministic.
    let mut totals: Vec<(&EmotionLabel, f64)> = Vec::new();
    for (label, weight) in labels.iter().zip(weights.iter()) {
        match totals.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, total)) => *total += weight,
            None => totals.push((label, *weight)),
        }
    }

    let mut best = &totals[0];
    for entry in &totals[1..] {
        // Strictly greater keeps the earlier label on ties
        if entry.1 > best.1 {
            best = entry;
        }
    }
    best.0.clone()
}

/// Concentration of the sequence on few labels, in [0, 1]
fn stability(labels: &[EmotionLabel]) -> f64 {
    let mut seen: Vec<&EmotionLabel> = Vec::new();
    for label in labels {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    1.0 - seen.len() as f64 / labels.len() as f64
}

/// Valence direction over the last (up to) five labels
///
/// Labels outside both valence sets count toward neither side, so a window
/// of unrecognized labels comes out stable.
fn trend(labels: &[EmotionLabel]) -> Trend {
    let start = labels.len().saturating_sub(TREND_WINDOW);
    let recent = &labels[start..];

    let positive = recent.iter().filter(|l| l.is_positive()).count();
    let negative = recent.iter().filter(|l| l.is_negative()).count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Trend::Improving,
        std::cmp::Ordering::Less => Trend::Declining,
        std::cmp::Ordering::Equal => Trend::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels(raw: &[&str]) -> Vec<EmotionLabel> {
        raw.iter().map(|l| EmotionLabel::from(*l)).collect()
    }

    #[test]
    fn test_empty_sequence_returns_sentinel() {
        let pattern = analyze_pattern(&[], 30);
        assert_eq!(pattern.dominant, EmotionLabel::unknown());
        assert_eq!(pattern.stability, 0.0);
        assert_eq!(pattern.trend, Trend::Neutral);
    }

    #[test]
    fn test_single_label() {
        let pattern = analyze_pattern(&labels(&["focused"]), 30);
        assert_eq!(pattern.dominant.as_str(), "focused");
        // One observation, one distinct label
        assert_eq!(pattern.stability, 0.0);
        assert_eq!(pattern.trend, Trend::Improving);
    }

    #[test]
    fn test_uniform_run_of_five() {
        let pattern = analyze_pattern(&labels(&["focused"; 5]), 30);
        assert_eq!(pattern.dominant.as_str(), "focused");
        assert!((pattern.stability - 0.8).abs() < 1e-12);
        assert_eq!(pattern.trend, Trend::Improving);
    }

    #[test]
    fn test_recency_weight_ramp_endpoints() {
        let w = recency_weights(5);
        assert_eq!(w.len(), 5);
        assert!((w[0] - 0.5).abs() < 1e-12);
        assert!((w[4] - 1.0).abs() < 1e-12);
        // Evenly spaced
        assert!((w[1] - 0.625).abs() < 1e-12);
        assert!((w[2] - 0.75).abs() < 1e-12);
        assert!((w[3] - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_single_element_ramp_is_low_end() {
        assert_eq!(recency_weights(1), vec![0.5]);
    }

    #[test]
    fn test_recent_label_outweighs_older_run() {
        // Six-element ramp is [0.5, 0.6, 0.7, 0.8, 0.9, 1.0]. Equal-length
        // runs split 1.8 against 2.7, so the newer run dominates.
        let pattern = analyze_pattern(
            &labels(&["bored", "bored", "bored", "focused", "focused", "focused"]),
            30,
        );
        assert_eq!(pattern.dominant.as_str(), "focused");
    }

    #[test]
    fn test_exact_weight_tie_first_seen_wins() {
        // Five-element ramp is [0.5, 0.625, 0.75, 0.875, 1.0], every weight
        // an exact binary fraction. happy at positions 0 and 4 totals 1.5;
        // bored at positions 1 and 3 also totals 1.5. First seen wins.
        let pattern = analyze_pattern(
            &labels(&["happy", "bored", "confused", "bored", "happy"]),
            30,
        );
        assert_eq!(pattern.dominant.as_str(), "happy");
    }

    #[test]
    fn test_stability_uniform_window() {
        // Four observations, one distinct label
        let pattern = analyze_pattern(&labels(&["focused"; 4]), 30);
        assert!((pattern.stability - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_stability_all_distinct() {
        let pattern = analyze_pattern(&labels(&["happy", "bored", "confused", "excited"]), 30);
        assert_eq!(pattern.stability, 0.0);
    }

    #[test]
    fn test_trend_uses_only_last_five() {
        // Ten negatives followed by five positives: trend ignores the
        // negatives entirely.
        let mut raw = vec!["confused"; 10];
        raw.extend(vec!["happy"; 5]);
        let pattern = analyze_pattern(&labels(&raw), 30);
        assert_eq!(pattern.trend, Trend::Improving);
    }

    #[test]
    fn test_trend_declining() {
        let pattern = analyze_pattern(&labels(&["happy", "confused", "frustrated", "bored"]), 30);
        assert_eq!(pattern.trend, Trend::Declining);
    }

    #[test]
    fn test_trend_tie_is_stable() {
        let pattern = analyze_pattern(&labels(&["happy", "bored"]), 30);
        assert_eq!(pattern.trend, Trend::Stable);
    }

    #[test]
    fn test_unrecognized_labels_trend_stable() {
        // Neither positive nor negative: both counts zero
        let pattern = analyze_pattern(&labels(&["pensive", "pensive", "pensive"]), 30);
        assert_eq!(pattern.trend, Trend::Stable);
        assert_eq!(pattern.dominant.as_str(), "pensive");
    }

    #[test]
    fn test_slightly_confused_not_negative_for_trend() {
        // slightly_confused sits outside the negative valence set
        let pattern = analyze_pattern(&labels(&["slightly_confused", "happy"]), 30);
        assert_eq!(pattern.trend, Trend::Improving);
    }

    #[test]
    fn test_time_window_parameter_has_no_effect() {
        // The parameter is contractual but dead; the result depends only on
        // the labels.
        let seq = labels(&["happy", "confused", "happy", "focused"]);
        let narrow = analyze_pattern(&seq, 1);
        let wide = analyze_pattern(&seq, 10_000);
        assert_eq!(narrow, wide);
    }

    proptest! {
        #[test]
        fn prop_stability_in_unit_interval(raw in prop::collection::vec("[a-z_]{1,16}", 1..40)) {
            let seq: Vec<EmotionLabel> = raw.iter().map(|l| EmotionLabel::from(l.as_str())).collect();
            let pattern = analyze_pattern(&seq, 30);
            prop_assert!(pattern.stability >= 0.0);
            prop_assert!(pattern.stability < 1.0);
        }

        #[test]
        fn prop_stability_matches_distinct_count(raw in prop::collection::vec("[a-c]", 1..30)) {
            let seq: Vec<EmotionLabel> = raw.iter().map(|l| EmotionLabel::from(l.as_str())).collect();
            let mut distinct: Vec<&EmotionLabel> = Vec::new();
            for label in &seq {
                if !distinct.contains(&label) {
                    distinct.push(label);
                }
            }
            let expected = 1.0 - distinct.len() as f64 / seq.len() as f64;
            let pattern = analyze_pattern(&seq, 30);
            prop_assert_eq!(pattern.stability, expected);
        }

        #[test]
        fn prop_dominant_is_drawn_from_sequence(raw in prop::collection::vec("[a-z_]{1,16}", 1..40)) {
            let seq: Vec<EmotionLabel> = raw.iter().map(|l| EmotionLabel::from(l.as_str())).collect();
            let pattern = analyze_pattern(&seq, 30);
            prop_assert!(seq.contains(&pattern.dominant));
        }

        #[test]
        fn prop_analysis_is_deterministic(raw in prop::collection::vec("[a-c]", 1..20)) {
            let seq: Vec<EmotionLabel> = raw.iter().map(|l| EmotionLabel::from(l.as_str())).collect();
            let first = analyze_pattern(&seq, 30);
            let second = analyze_pattern(&seq, 30);
            prop_assert_eq!(first, second);
        }
    }
}
