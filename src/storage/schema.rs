//! Database schema for the learning platform.
//!
//! Creates tables for:
//! - users: Accounts, including passwordless guest accounts
//! - programming_languages: Landing-page language tiles
//! - courses: Course catalog with structured JSON descriptions
//! - quiz_questions: Per-course, per-level quiz banks
//! - progress: Per-topic completion state
//! - emotions: Timestamped emotion observations feeding the analytics engine

use crate::error::{MathesisError, Result};

/// Initialize all platform tables on an open connection
///
/// Takes a connection rather than a path so that in-memory databases keep
/// their tables; every `Builder::new_local(":memory:")` call creates a fresh
/// database.
pub async fn init_tables(conn: &libsql::Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT UNIQUE,
            password_hash TEXT,
            created_at TEXT NOT NULL,
            is_guest INTEGER NOT NULL DEFAULT 0
        )
        "#,
        libsql::params![],
    )
    .await
    .map_err(|e| MathesisError::Database(format!("Failed to create users table: {}", e)))?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS programming_languages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            icon_class TEXT NOT NULL
        )
        "#,
        libsql::params![],
    )
    .await
    .map_err(|e| {
        MathesisError::Database(format!(
            "Failed to create programming_languages table: {}",
            e
        ))
    })?;

    // description holds the structured course outline as JSON
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL UNIQUE,
            language TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            prerequisites TEXT,
            description TEXT NOT NULL
        )
        "#,
        libsql::params![],
    )
    .await
    .map_err(|e| MathesisError::Database(format!("Failed to create courses table: {}", e)))?;

    // options holds the answer choices as a JSON array
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS quiz_questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER NOT NULL,
            level TEXT NOT NULL,
            question TEXT NOT NULL,
            options TEXT NOT NULL,
            correct_answer INTEGER NOT NULL,
            explanation TEXT NOT NULL
        )
        "#,
        libsql::params![],
    )
    .await
    .map_err(|e| {
        MathesisError::Database(format!("Failed to create quiz_questions table: {}", e))
    })?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS progress (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            course_id INTEGER NOT NULL,
            topic TEXT NOT NULL,
            status TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(user_id, course_id, topic)
        )
        "#,
        libsql::params![],
    )
    .await
    .map_err(|e| MathesisError::Database(format!("Failed to create progress table: {}", e)))?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS emotions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            emotion TEXT NOT NULL,
            recorded_at TEXT NOT NULL
        )
        "#,
        libsql::params![],
    )
    .await
    .map_err(|e| MathesisError::Database(format!("Failed to create emotions table: {}", e)))?;

    // Indexes for the per-user queries on the hot path
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_emotions_user_time ON emotions(user_id, recorded_at)",
        libsql::params![],
    )
    .await
    .map_err(|e| MathesisError::Database(format!("Failed to create index: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_progress_user ON progress(user_id)",
        libsql::params![],
    )
    .await
    .map_err(|e| MathesisError::Database(format!("Failed to create index: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_quiz_course_level ON quiz_questions(course_id, level)",
        libsql::params![],
    )
    .await
    .map_err(|e| MathesisError::Database(format!("Failed to create index: {}", e)))?;

    tracing::info!("Learning platform database schema initialized");
    Ok(())
}
