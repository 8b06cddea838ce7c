//! Core data types for the Mathesis learning platform
//!
//! This module defines the fundamental data structures used throughout
//! mathesis: emotion observations and the derived pattern summaries, progress
//! snapshots, recommendation bundles, and the course catalog records owned by
//! the persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for user accounts
///
/// Wraps the database row id to provide type safety and prevent mixing user
/// ids with other integer identifiers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for courses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub i64);

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Labels in the positive valence set (pattern trend and state classification)
pub const POSITIVE_EMOTIONS: [&str; 4] = ["very_focused", "focused", "happy", "excited"];

/// Labels in the negative valence set
pub const NEGATIVE_EMOTIONS: [&str; 4] = ["very_confused", "confused", "frustrated", "bored"];

/// Labels counted toward the confusion ratio by the state classifier
pub const CONFUSION_EMOTIONS: [&str; 3] = ["slightly_confused", "confused", "very_confused"];

/// Labels counted toward the engagement ratio by the state classifier
pub const ENGAGEMENT_EMOTIONS: [&str; 2] = ["very_focused", "focused"];

/// Discrete emotion label produced by the upstream classifier
///
/// The vocabulary is open-ended: labels outside the canonical set are carried
/// through untouched. They never match the fixed valence sets but still count
/// toward totals and weights, so a misconfigured classifier degrades analysis
/// quality without breaking it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionLabel(String);

impl EmotionLabel {
    /// Sentinel returned when no observations are available
    pub fn unknown() -> Self {
        Self("unknown".to_string())
    }

    /// Create a label from a raw classifier string
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Raw label text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label belongs to the positive valence set
    pub fn is_positive(&self) -> bool {
        POSITIVE_EMOTIONS.contains(&self.0.as_str())
    }

    /// Whether this label belongs to the negative valence set
    pub fn is_negative(&self) -> bool {
        NEGATIVE_EMOTIONS.contains(&self.0.as_str())
    }

    /// Whether this label counts toward the confusion ratio
    pub fn is_confusion(&self) -> bool {
        CONFUSION_EMOTIONS.contains(&self.0.as_str())
    }

    /// Whether this label counts toward the engagement ratio
    pub fn is_engagement(&self) -> bool {
        ENGAGEMENT_EMOTIONS.contains(&self.0.as_str())
    }
}

impl From<&str> for EmotionLabel {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EmotionLabel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single classified emotion observation
///
/// Observations arrive from the upstream classifier already ordered; insertion
/// order is chronological order, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionObservation {
    /// Classified emotion label
    pub emotion: EmotionLabel,

    /// When the observation was recorded
    pub timestamp: DateTime<Utc>,
}

impl EmotionObservation {
    /// Create an observation stamped with the current time
    pub fn now(emotion: impl Into<EmotionLabel>) -> Self {
        Self {
            emotion: emotion.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Short-window directional signal of emotional valence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Recent window leans positive
    Improving,

    /// Recent window leans negative
    Declining,

    /// Balanced window, including the all-unknown case
    Stable,

    /// Sentinel for empty input
    Neutral,
}

impl Trend {
    /// Additive adjustment this trend contributes to the effectiveness score
    pub fn bonus(&self) -> f64 {
        match self {
            Trend::Improving => 10.0,
            Trend::Declining => -10.0,
            Trend::Stable | Trend::Neutral => 0.0,
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Stable => write!(f, "stable"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

/// Derived summary of an observation window
///
/// Ephemeral: recomputed on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPattern {
    /// Label with the highest accumulated recency weight
    pub dominant: EmotionLabel,

    /// Concentration of the window on a single label, in [0, 1]
    pub stability: f64,

    /// Valence direction over the last (up to) five observations
    pub trend: Trend,
}

impl EmotionPattern {
    /// Sentinel pattern for an empty observation window
    pub fn sentinel() -> Self {
        Self {
            dominant: EmotionLabel::unknown(),
            stability: 0.0,
            trend: Trend::Neutral,
        }
    }
}

/// Topic-completion snapshot owned by the progress-tracking store
///
/// `total_topics == 0` is a caller precondition violation when scoring; the
/// effectiveness scorer rejects it rather than defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Topics the learner has completed
    pub completed_topics: u32,

    /// Topics across the learner's curriculum
    pub total_topics: u32,
}

/// Pacing adjustment recommended for the learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningPace {
    Reduced,
    Standard,
    Accelerated,
}

impl std::fmt::Display for LearningPace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LearningPace::Reduced => write!(f, "reduced"),
            LearningPace::Standard => write!(f, "standard"),
            LearningPace::Accelerated => write!(f, "accelerated"),
        }
    }
}

/// Content presentation style recommended for the learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    Visual,
    Mixed,
    Advanced,
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentFormat::Visual => write!(f, "visual"),
            ContentFormat::Mixed => write!(f, "mixed"),
            ContentFormat::Advanced => write!(f, "advanced"),
        }
    }
}

/// Discrete pacing/format/break/activity bundle
///
/// Derived fresh on every request from the latest observation window and
/// progress snapshot; there is no persisted lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommended learning pace
    pub learning_pace: LearningPace,

    /// Recommended content format
    pub content_format: ContentFormat,

    /// Minutes between suggested breaks
    pub break_interval_minutes: u32,

    /// Suggested activities, order preserved
    pub suggested_activities: Vec<String>,
}

impl Default for Recommendation {
    /// The mid-range bundle: applied whenever the effectiveness score lands
    /// in [50, 80]
    fn default() -> Self {
        Self {
            learning_pace: LearningPace::Standard,
            content_format: ContentFormat::Mixed,
            break_interval_minutes: 30,
            suggested_activities: Vec::new(),
        }
    }
}

/// Full output of the recommendation pipeline for one learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPlan {
    /// Pattern summary the plan was derived from
    pub pattern: EmotionPattern,

    /// Composite effectiveness score in [0, 100]
    pub effectiveness: f64,

    /// Recommendation bundle selected for the score
    pub recommendation: Recommendation,
}

/// Coarse learning-state label for one observation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningState {
    /// Confusion dominates the window (ratio strictly above 0.5)
    NeedsHelp,

    /// Engagement dominates the window (ratio strictly above 0.6)
    GoodProgress,

    /// Dominant label is positive
    Engaged,

    /// Dominant label is negative
    Struggling,

    /// No set matches the dominant label
    Neutral,

    /// Sentinel for empty input
    Unknown,
}

impl std::fmt::Display for LearningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LearningState::NeedsHelp => write!(f, "needs_help"),
            LearningState::GoodProgress => write!(f, "good_progress"),
            LearningState::Engaged => write!(f, "engaged"),
            LearningState::Struggling => write!(f, "struggling"),
            LearningState::Neutral => write!(f, "neutral"),
            LearningState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Completion status of one topic for one learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    Started,
    Completed,
}

impl TopicStatus {
    /// Parse a stored status string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "started" => Some(TopicStatus::Started),
            "completed" => Some(TopicStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopicStatus::Started => write!(f, "started"),
            TopicStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Registered user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Account id
    pub id: UserId,

    /// Display name, unique across accounts
    pub username: String,

    /// Login email; guest accounts may have none
    pub email: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// Whether this is an anonymous guest account
    pub is_guest: bool,
}

/// New account request, before persistence assigns an id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    /// Plaintext password; digested by the store, never persisted verbatim
    pub password: String,
    pub is_guest: bool,
}

/// Course difficulty tier, shared with quiz question levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Parse a stored difficulty string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

/// One module within a course description document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseModule {
    /// Module title
    pub title: String,

    /// Topic titles covered by the module
    pub topics: Vec<String>,

    /// Number of exercises attached to the module
    pub exercises: u32,
}

/// Structured course description, stored as a JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDescription {
    /// One-paragraph course overview
    pub overview: String,

    /// Ordered modules
    pub modules: Vec<CourseModule>,

    /// External resource links keyed by kind (documentation, practice, ...)
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
}

/// Catalog course record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course id
    pub id: CourseId,

    /// Course title, unique in the catalog
    pub title: String,

    /// Primary programming language taught
    pub language: String,

    /// Difficulty tier
    pub difficulty: Difficulty,

    /// Free-text prerequisites; empty for entry-level courses
    pub prerequisites: Option<String>,

    /// Structured description document
    pub description: CourseDescription,
}

impl Course {
    /// Total number of topics across all modules
    pub fn total_topics(&self) -> u32 {
        self.description
            .modules
            .iter()
            .map(|m| m.topics.len() as u32)
            .sum()
    }
}

/// Programming language entry shown on the catalog landing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgrammingLanguage {
    pub name: String,
    pub description: String,
    /// CSS icon class used by the frontend
    pub icon_class: String,
}

/// Quiz question attached to a course and difficulty level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question id
    pub id: i64,

    /// Course this question belongs to
    pub course_id: CourseId,

    /// Difficulty level of the question
    pub level: Difficulty,

    /// Question text
    pub question: String,

    /// Answer options, order preserved
    pub options: Vec<String>,

    /// Index into `options` of the correct answer
    pub correct_answer: u32,

    /// Explanation shown after answering
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_set_membership() {
        assert!(EmotionLabel::from("focused").is_positive());
        assert!(EmotionLabel::from("focused").is_engagement());
        assert!(!EmotionLabel::from("focused").is_negative());

        assert!(EmotionLabel::from("confused").is_negative());
        assert!(EmotionLabel::from("confused").is_confusion());

        // slightly_confused counts toward confusion but is not in the
        // negative valence set
        let slightly = EmotionLabel::from("slightly_confused");
        assert!(slightly.is_confusion());
        assert!(!slightly.is_negative());
    }

    #[test]
    fn test_unrecognized_label_matches_no_set() {
        let label = EmotionLabel::from("perplexed");
        assert!(!label.is_positive());
        assert!(!label.is_negative());
        assert!(!label.is_confusion());
        assert!(!label.is_engagement());
        assert_eq!(label.as_str(), "perplexed");
    }

    #[test]
    fn test_trend_bonus() {
        assert_eq!(Trend::Improving.bonus(), 10.0);
        assert_eq!(Trend::Declining.bonus(), -10.0);
        assert_eq!(Trend::Stable.bonus(), 0.0);
        assert_eq!(Trend::Neutral.bonus(), 0.0);
    }

    #[test]
    fn test_default_recommendation_is_mid_range_bundle() {
        let rec = Recommendation::default();
        assert_eq!(rec.learning_pace, LearningPace::Standard);
        assert_eq!(rec.content_format, ContentFormat::Mixed);
        assert_eq!(rec.break_interval_minutes, 30);
        assert!(rec.suggested_activities.is_empty());
    }

    #[test]
    fn test_course_total_topics() {
        let course = Course {
            id: CourseId(1),
            title: "Test".to_string(),
            language: "python".to_string(),
            difficulty: Difficulty::Beginner,
            prerequisites: None,
            description: CourseDescription {
                overview: "o".to_string(),
                modules: vec![
                    CourseModule {
                        title: "A".to_string(),
                        topics: vec!["t1".to_string(), "t2".to_string()],
                        exercises: 3,
                    },
                    CourseModule {
                        title: "B".to_string(),
                        topics: vec!["t3".to_string()],
                        exercises: 1,
                    },
                ],
                resources: BTreeMap::new(),
            },
        };
        assert_eq!(course.total_topics(), 3);
    }

    #[test]
    fn test_observation_serde_field_names() {
        let obs = EmotionObservation {
            emotion: EmotionLabel::from("happy"),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["emotion"], "happy");
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_learning_state_serde() {
        let json = serde_json::to_string(&LearningState::NeedsHelp).unwrap();
        assert_eq!(json, "\"needs_help\"");
    }
}
