//! Storage layer for the Mathesis learning platform
//!
//! Provides the store abstraction the analytics pipeline and API depend on,
//! plus the libsql implementation, schema bootstrap, and demo catalog
//! seeding.

pub mod libsql;
pub mod schema;
pub mod seed;

use crate::error::Result;
use crate::types::{
    Course, CourseId, Difficulty, EmotionLabel, EmotionObservation, NewUser, ProgrammingLanguage,
    ProgressSnapshot, QuizQuestion, TopicStatus, UserAccount, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

/// Store trait defining all persistence operations
///
/// The analytics engine and request handlers hold this as a trait object;
/// nothing above the storage layer opens connections itself.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LearningStore: Send + Sync {
    /// Create a user account, rejecting duplicate usernames or emails
    async fn create_user(&self, user: &NewUser) -> Result<UserAccount>;

    /// Fetch a user by id
    async fn user_by_id(&self, id: UserId) -> Result<UserAccount>;

    /// Look up a user by email
    async fn user_by_email(&self, email: &str) -> Result<Option<UserAccount>>;

    /// Look up a user by username
    async fn user_by_username(&self, username: &str) -> Result<Option<UserAccount>>;

    /// List all accounts, newest first
    async fn list_users(&self) -> Result<Vec<UserAccount>>;

    /// Check email and password against the stored digest
    ///
    /// Returns `None` for unknown emails, guest accounts, and digest
    /// mismatches alike; callers must not distinguish the cases.
    async fn verify_credentials(&self, email: &str, password: &str)
        -> Result<Option<UserAccount>>;

    /// List the programming languages shown on the landing page
    async fn list_languages(&self) -> Result<Vec<ProgrammingLanguage>>;

    /// List the course catalog
    async fn list_courses(&self) -> Result<Vec<Course>>;

    /// Fetch a course by id
    async fn course_by_id(&self, id: CourseId) -> Result<Course>;

    /// Quiz questions for one course and difficulty level
    async fn quiz_questions(
        &self,
        course_id: CourseId,
        level: Difficulty,
    ) -> Result<Vec<QuizQuestion>>;

    /// Record one emotion observation for a user
    async fn save_emotion(
        &self,
        user_id: UserId,
        label: &EmotionLabel,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Recent observation window for a user, chronological, oldest first
    ///
    /// The store owns the window bound; callers get at most the configured
    /// number of most-recent observations.
    async fn recent_emotions(&self, user_id: UserId) -> Result<Vec<EmotionObservation>>;

    /// Record or update topic progress for a user
    async fn save_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
        topic: &str,
        status: TopicStatus,
    ) -> Result<()>;

    /// Topic-completion snapshot for a user
    ///
    /// Completed counts the user's completed topics; total sums topic counts
    /// across the whole course catalog. An empty catalog yields
    /// `total_topics == 0`, which the effectiveness scorer rejects.
    async fn progress_snapshot(&self, user_id: UserId) -> Result<ProgressSnapshot>;
}
