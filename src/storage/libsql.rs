//! LibSQL learning store implementation
//!
//! Persists accounts, the course catalog, quiz banks, per-topic progress, and
//! the emotion observation stream using Turso/libSQL.

use crate::error::{MathesisError, Result};
use crate::storage::{schema, LearningStore};
use crate::types::{
    Course, CourseDescription, CourseId, Difficulty, EmotionLabel, EmotionObservation, NewUser,
    ProgrammingLanguage, ProgressSnapshot, QuizQuestion, TopicStatus, UserAccount, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params, Builder, Connection};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Default number of most-recent observations handed to the analytics engine
pub const DEFAULT_EMOTION_WINDOW: usize = 20;

const USER_COLUMNS: &str = "id, username, email, created_at, is_guest";
const COURSE_COLUMNS: &str = "id, title, language, difficulty, prerequisites, description";

/// Database connection mode
#[derive(Debug, Clone)]
pub enum ConnectionMode {
    /// Local file-based database
    Local(String),
    /// In-memory database (for testing)
    InMemory,
}

/// LibSQL learning store
///
/// Holds the connection opened at construction time. A fresh `connect()` on a
/// `:memory:` database starts empty, so every operation clones this handle
/// instead of reconnecting.
pub struct LibsqlStore {
    conn: Connection,
    emotion_window: usize,
}

impl LibsqlStore {
    /// Validate database file before opening
    ///
    /// Checks:
    /// 1. Database file exists (for local paths)
    /// 2. Database is not corrupted (basic SQLite header check)
    /// 3. File is readable
    ///
    /// # Returns
    /// * `Ok(true)` if database exists and is valid
    /// * `Ok(false)` if database doesn't exist and must_exist=false
    /// * `Err(MathesisError)` with actionable message if validation fails
    fn validate_database_file(db_path: &str, must_exist: bool) -> Result<bool> {
        use std::fs;
        use std::path::Path;

        let path = Path::new(db_path);

        if !path.exists() {
            if must_exist {
                return Err(MathesisError::Database(format!(
                    "Database file not found at '{}'. Please run 'mathesis init' first or check your database path configuration.",
                    db_path
                )));
            } else {
                // Database doesn't exist, but that's ok - caller will create it
                return Ok(false);
            }
        }

        // SQLite files start with "SQLite format 3\0" (16 bytes)
        match fs::read(path) {
            Ok(bytes) => {
                if bytes.len() < 16 {
                    return Err(MathesisError::Database(format!(
                        "Database file at '{}' is corrupted or invalid (file too small). Please delete it and run 'mathesis init' to reinitialize.",
                        db_path
                    )));
                }

                let header = &bytes[0..16];
                let expected_header = b"SQLite format 3\0";

                if header != expected_header {
                    return Err(MathesisError::Database(format!(
                        "Database file at '{}' is corrupted or not a valid SQLite database. Please delete it and run 'mathesis init' to reinitialize.",
                        db_path
                    )));
                }

                debug!("Database file validation passed: {}", db_path);
                Ok(true)
            }
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains("permission") || error_msg.contains("Permission") {
                    Err(MathesisError::Database(format!(
                        "Cannot read database file at '{}': Permission denied. Please check file permissions.",
                        db_path
                    )))
                } else {
                    Err(MathesisError::Database(format!(
                        "Cannot read database file at '{}': {}. The file may be corrupted or inaccessible.",
                        db_path, e
                    )))
                }
            }
        }
    }

    /// Create a new learning store with validation
    ///
    /// # Arguments
    /// * `mode` - Connection mode (local or in-memory)
    /// * `create_if_missing` - If true, create database if it doesn't exist. If false, error on missing database.
    pub async fn new_with_validation(mode: ConnectionMode, create_if_missing: bool) -> Result<Self> {
        info!(
            "Connecting to LibSQL database: {:?} (create_if_missing: {})",
            mode, create_if_missing
        );

        if let ConnectionMode::Local(ref path) = mode {
            let exists = Self::validate_database_file(path, !create_if_missing)?;

            if create_if_missing && !exists {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            MathesisError::Database(format!(
                                "Failed to create database directory {}: {}",
                                parent.display(),
                                e
                            ))
                        })?;
                    }
                }
            }
        }

        let db = match mode {
            ConnectionMode::Local(ref path) => Builder::new_local(path).build().await.map_err(
                |e| MathesisError::Database(format!("Failed to create local database: {}", e)),
            )?,
            ConnectionMode::InMemory => Builder::new_local(":memory:").build().await.map_err(
                |e| MathesisError::Database(format!("Failed to create in-memory database: {}", e)),
            )?,
        };

        let conn = db
            .connect()
            .map_err(|e| MathesisError::Database(format!("Failed to get connection: {}", e)))?;

        info!("LibSQL database connection established");

        let store = Self {
            conn,
            emotion_window: DEFAULT_EMOTION_WINDOW,
        };

        // Verify database health before creating tables
        store.verify_database_health().await?;

        schema::init_tables(&store.conn).await?;

        if let ConnectionMode::Local(ref path) = mode {
            if !std::path::Path::new(path).exists() {
                return Err(MathesisError::Database(format!(
                    "Database file not created after initialization: {}",
                    path
                )));
            }
            debug!("Verified database file exists: {}", path);
        }

        Ok(store)
    }

    /// Create a new learning store
    ///
    /// Requires the database to exist; returns a clear error if it is
    /// missing or corrupted. For explicit creation, use
    /// `new_with_validation(..., true)`.
    pub async fn new(mode: ConnectionMode) -> Result<Self> {
        Self::new_with_validation(mode, false).await
    }

    /// Create from a string path
    ///
    /// Parses database path and creates the appropriate connection mode:
    /// - ":memory:" -> InMemory
    /// - Other -> Local file path
    pub async fn from_path(db_path: &str) -> Result<Self> {
        let mode = if db_path == ":memory:" {
            ConnectionMode::InMemory
        } else {
            ConnectionMode::Local(db_path.to_string())
        };

        Self::new(mode).await
    }

    /// Set the size of the recent-observation window handed to analytics
    pub fn set_emotion_window(&mut self, window: usize) {
        self.emotion_window = window;
    }

    /// Get a connection handle
    fn get_conn(&self) -> Connection {
        self.conn.clone()
    }

    /// Verify database health before operations
    async fn verify_database_health(&self) -> Result<()> {
        let conn = self.get_conn();

        // Basic query to detect corruption
        conn.query("SELECT 1", params![]).await.map_err(|e| {
            MathesisError::Database(format!(
                "Database corruption detected or invalid database file: {}",
                e
            ))
        })?;

        // Check if database is writable
        let write_test = r#"
            CREATE TABLE IF NOT EXISTS _health_check (id INTEGER PRIMARY KEY);
            DROP TABLE IF EXISTS _health_check;
        "#;

        if let Err(e) = conn.execute_batch(write_test).await {
            let error_msg = e.to_string().to_lowercase();
            if error_msg.contains("read") && error_msg.contains("only")
                || error_msg.contains("readonly")
                || error_msg.contains("permission")
            {
                return Err(MathesisError::Database(format!(
                    "Database is read-only or lacks write permissions: {}",
                    e
                )));
            }
            return Err(MathesisError::Database(format!(
                "Database write test failed: {}",
                e
            )));
        }

        debug!("Database health check passed");
        Ok(())
    }

    /// Convert a libsql row to a UserAccount
    ///
    /// Expects columns in `USER_COLUMNS` order.
    fn row_to_user(row: &libsql::Row) -> Result<UserAccount> {
        let id: i64 = row.get(0)?;
        let username: String = row.get(1)?;
        let email: Option<String> = row.get(2)?;

        let created_at: String = row.get(3)?;
        let created_at = parse_timestamp(&created_at)?;

        let is_guest: i64 = row.get(4)?;

        Ok(UserAccount {
            id: UserId(id),
            username,
            email,
            created_at,
            is_guest: is_guest != 0,
        })
    }

    /// Convert a libsql row to a Course
    ///
    /// Expects columns in `COURSE_COLUMNS` order.
    fn row_to_course(row: &libsql::Row) -> Result<Course> {
        let id: i64 = row.get(0)?;
        let title: String = row.get(1)?;
        let language: String = row.get(2)?;

        let difficulty_str: String = row.get(3)?;
        let difficulty = Difficulty::parse(&difficulty_str).ok_or_else(|| {
            MathesisError::Other(format!("Unknown difficulty level: {}", difficulty_str))
        })?;

        let prerequisites: Option<String> = row.get(4)?;

        let description_json: String = row.get(5)?;
        let description: CourseDescription = serde_json::from_str(&description_json)?;

        Ok(Course {
            id: CourseId(id),
            title,
            language,
            difficulty,
            prerequisites,
            description,
        })
    }

    /// Convert a libsql row to a QuizQuestion
    fn row_to_question(row: &libsql::Row) -> Result<QuizQuestion> {
        let id: i64 = row.get(0)?;
        let course_id: i64 = row.get(1)?;

        let level_str: String = row.get(2)?;
        let level = Difficulty::parse(&level_str).ok_or_else(|| {
            MathesisError::Other(format!("Unknown quiz level: {}", level_str))
        })?;

        let question: String = row.get(3)?;

        let options_json: String = row.get(4)?;
        let options: Vec<String> = serde_json::from_str(&options_json)?;

        let correct_answer: i64 = row.get(5)?;
        let explanation: String = row.get(6)?;

        Ok(QuizQuestion {
            id,
            course_id: CourseId(course_id),
            level,
            question,
            options,
            correct_answer: correct_answer as u32,
            explanation,
        })
    }

    /// Insert a catalog course, returning its assigned id
    ///
    /// Seeding support; application code reads the catalog through
    /// [`LearningStore`].
    pub async fn insert_course(
        &self,
        title: &str,
        language: &str,
        difficulty: Difficulty,
        prerequisites: Option<&str>,
        description: &CourseDescription,
    ) -> Result<CourseId> {
        let conn = self.get_conn();

        conn.execute(
            "INSERT INTO courses (title, language, difficulty, prerequisites, description) VALUES (?, ?, ?, ?, ?)",
            params![
                title,
                language,
                difficulty.to_string(),
                prerequisites,
                serde_json::to_string(description)?,
            ],
        )
        .await
        .map_err(|e| MathesisError::Database(format!("Failed to insert course: {}", e)))?;

        Ok(CourseId(conn.last_insert_rowid()))
    }

    /// Insert a landing-page programming language entry
    pub async fn insert_language(&self, language: &ProgrammingLanguage) -> Result<()> {
        let conn = self.get_conn();

        conn.execute(
            "INSERT INTO programming_languages (name, description, icon_class) VALUES (?, ?, ?)",
            params![
                language.name.clone(),
                language.description.clone(),
                language.icon_class.clone(),
            ],
        )
        .await
        .map_err(|e| MathesisError::Database(format!("Failed to insert language: {}", e)))?;

        Ok(())
    }

    /// Insert a quiz question into a course's bank
    pub async fn insert_quiz_question(
        &self,
        course_id: CourseId,
        level: Difficulty,
        question: &str,
        options: &[String],
        correct_answer: u32,
        explanation: &str,
    ) -> Result<()> {
        let conn = self.get_conn();

        conn.execute(
            "INSERT INTO quiz_questions (course_id, level, question, options, correct_answer, explanation) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                course_id.0,
                level.to_string(),
                question,
                serde_json::to_string(options)?,
                correct_answer as i64,
                explanation,
            ],
        )
        .await
        .map_err(|e| MathesisError::Database(format!("Failed to insert quiz question: {}", e)))?;

        Ok(())
    }

    /// Delete all catalog rows ahead of a reseed
    ///
    /// Clears courses, quiz banks, languages, and progress rows that point at
    /// the old catalog. Accounts and the emotion stream survive.
    pub async fn clear_catalog(&self) -> Result<()> {
        let conn = self.get_conn();

        for table in ["quiz_questions", "progress", "courses", "programming_languages"] {
            conn.execute(&format!("DELETE FROM {}", table), params![])
                .await
                .map_err(|e| {
                    MathesisError::Database(format!("Failed to clear {} table: {}", table, e))
                })?;
        }

        Ok(())
    }
}

/// Hex-encoded SHA-256 digest of a password
fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
}

/// Parse an RFC 3339 timestamp column
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| MathesisError::Other(format!("Invalid timestamp: {}", e)))
}

#[async_trait]
impl LearningStore for LibsqlStore {
    async fn create_user(&self, user: &NewUser) -> Result<UserAccount> {
        debug!("Creating user: {}", user.username);

        if self.user_by_username(&user.username).await?.is_some() {
            return Err(MathesisError::AccountExists(user.username.clone()));
        }
        if let Some(ref email) = user.email {
            if self.user_by_email(email).await?.is_some() {
                return Err(MathesisError::AccountExists(email.clone()));
            }
        }

        let password_hash = if user.is_guest {
            None
        } else {
            Some(digest_password(&user.password))
        };

        let conn = self.get_conn();
        conn.execute(
            "INSERT INTO users (username, email, password_hash, created_at, is_guest) VALUES (?, ?, ?, ?, ?)",
            params![
                user.username.clone(),
                user.email.clone(),
                password_hash,
                Utc::now().to_rfc3339(),
                if user.is_guest { 1i64 } else { 0i64 },
            ],
        )
        .await
        .map_err(|e| MathesisError::Database(format!("Failed to insert user: {}", e)))?;

        let id = UserId(conn.last_insert_rowid());
        debug!("User created: {} ({})", user.username, id);

        self.user_by_id(id).await
    }

    async fn user_by_id(&self, id: UserId) -> Result<UserAccount> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id.0],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to query user: {}", e)))?;

        let row = rows
            .next()
            .await?
            .ok_or_else(|| MathesisError::UserNotFound(id.to_string()))?;

        Self::row_to_user(&row)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![email],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to query user by email: {}", e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                &format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS),
                params![username],
            )
            .await
            .map_err(|e| {
                MathesisError::Database(format!("Failed to query user by username: {}", e))
            })?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
                    USER_COLUMNS
                ),
                params![],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(Self::row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserAccount>> {
        debug!("Verifying credentials for {}", email);

        let conn = self.get_conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {}, password_hash FROM users WHERE email = ?",
                    USER_COLUMNS
                ),
                params![email],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to query credentials: {}", e)))?;

        let row = match rows.next().await? {
            Some(row) => row,
            None => return Ok(None),
        };

        let account = Self::row_to_user(&row)?;
        if account.is_guest {
            return Ok(None);
        }

        let stored: Option<String> = row.get(5)?;
        match stored {
            Some(stored) if stored == digest_password(password) => Ok(Some(account)),
            _ => Ok(None),
        }
    }

    async fn list_languages(&self) -> Result<Vec<ProgrammingLanguage>> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                "SELECT name, description, icon_class FROM programming_languages ORDER BY id",
                params![],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to list languages: {}", e)))?;

        let mut languages = Vec::new();
        while let Some(row) = rows.next().await? {
            languages.push(ProgrammingLanguage {
                name: row.get(0)?,
                description: row.get(1)?,
                icon_class: row.get(2)?,
            });
        }

        Ok(languages)
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                &format!("SELECT {} FROM courses ORDER BY id", COURSE_COLUMNS),
                params![],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to list courses: {}", e)))?;

        let mut courses = Vec::new();
        while let Some(row) = rows.next().await? {
            courses.push(Self::row_to_course(&row)?);
        }

        Ok(courses)
    }

    async fn course_by_id(&self, id: CourseId) -> Result<Course> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                &format!("SELECT {} FROM courses WHERE id = ?", COURSE_COLUMNS),
                params![id.0],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to query course: {}", e)))?;

        let row = rows
            .next()
            .await?
            .ok_or(MathesisError::CourseNotFound(id.0))?;

        Self::row_to_course(&row)
    }

    async fn quiz_questions(
        &self,
        course_id: CourseId,
        level: Difficulty,
    ) -> Result<Vec<QuizQuestion>> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                "SELECT id, course_id, level, question, options, correct_answer, explanation
                 FROM quiz_questions WHERE course_id = ? AND level = ? ORDER BY id",
                params![course_id.0, level.to_string()],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to query quiz questions: {}", e)))?;

        let mut questions = Vec::new();
        while let Some(row) = rows.next().await? {
            questions.push(Self::row_to_question(&row)?);
        }

        Ok(questions)
    }

    async fn save_emotion(
        &self,
        user_id: UserId,
        label: &EmotionLabel,
        at: DateTime<Utc>,
    ) -> Result<()> {
        debug!("Recording emotion {} for user {}", label, user_id);

        let conn = self.get_conn();
        conn.execute(
            "INSERT INTO emotions (user_id, emotion, recorded_at) VALUES (?, ?, ?)",
            params![user_id.0, label.as_str(), at.to_rfc3339()],
        )
        .await
        .map_err(|e| MathesisError::Database(format!("Failed to insert emotion: {}", e)))?;

        Ok(())
    }

    async fn recent_emotions(&self, user_id: UserId) -> Result<Vec<EmotionObservation>> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                "SELECT emotion, recorded_at FROM emotions WHERE user_id = ?
                 ORDER BY recorded_at DESC, id DESC LIMIT ?",
                params![user_id.0, self.emotion_window as i64],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to query emotions: {}", e)))?;

        let mut observations = Vec::new();
        while let Some(row) = rows.next().await? {
            let emotion: String = row.get(0)?;
            let recorded_at: String = row.get(1)?;

            observations.push(EmotionObservation {
                emotion: EmotionLabel::new(emotion),
                timestamp: parse_timestamp(&recorded_at)?,
            });
        }

        // Query returns newest first; analytics weighting expects oldest first
        observations.reverse();

        debug!(
            "Fetched {} recent observations for user {}",
            observations.len(),
            user_id
        );
        Ok(observations)
    }

    async fn save_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
        topic: &str,
        status: TopicStatus,
    ) -> Result<()> {
        debug!(
            "Recording progress for user {}: {} -> {}",
            user_id, topic, status
        );

        let conn = self.get_conn();
        conn.execute(
            "INSERT OR REPLACE INTO progress (user_id, course_id, topic, status, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![
                user_id.0,
                course_id.0,
                topic,
                status.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )
        .await
        .map_err(|e| MathesisError::Database(format!("Failed to record progress: {}", e)))?;

        Ok(())
    }

    async fn progress_snapshot(&self, user_id: UserId) -> Result<ProgressSnapshot> {
        let conn = self.get_conn();
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM progress WHERE user_id = ? AND status = ?",
                params![user_id.0, TopicStatus::Completed.to_string()],
            )
            .await
            .map_err(|e| MathesisError::Database(format!("Failed to count progress: {}", e)))?;

        let completed = if let Some(row) = rows.next().await? {
            let count: i64 = row.get(0)?;
            count as u32
        } else {
            0
        };

        let total = self
            .list_courses()
            .await?
            .iter()
            .map(|c| c.total_topics())
            .sum();

        Ok(ProgressSnapshot {
            completed_topics: completed,
            total_topics: total,
        })
    }
}
