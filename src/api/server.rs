//! HTTP API server for the learning platform
//!
//! JSON over REST. Signup, login, and the health check are open; every
//! other route requires a bearer token issued by the session registry.

use super::sessions::SessionManager;
use crate::analytics::RecommendationEngine;
use crate::error::{MathesisError, Result};
use crate::storage::LearningStore;
use crate::types::{
    Course, CourseId, Difficulty, EmotionLabel, EmotionObservation, LearningPlan, LearningState,
    NewUser, ProgrammingLanguage, ProgressSnapshot, QuizQuestion, TopicStatus, UserAccount, UserId,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 3000).into(),
        }
    }
}

/// Shared state handed to every request handler
#[derive(Clone)]
struct AppState {
    /// Persistence backend
    store: Arc<dyn LearningStore>,
    /// Live bearer tokens
    sessions: Arc<SessionManager>,
    /// Analytics pipeline over the same store
    engine: Arc<RecommendationEngine>,
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server over the given store
    pub fn new(config: ApiServerConfig, store: Arc<dyn LearningStore>) -> Self {
        let sessions = Arc::new(SessionManager::new());
        let engine = Arc::new(RecommendationEngine::new(store.clone()));

        Self {
            config,
            state: AppState {
                store,
                sessions,
                engine,
            },
        }
    }

    /// Build router
    fn build_router(state: AppState) -> Router {
        Router::new()
            // Accounts and sessions
            .route("/auth/signup", post(signup_handler))
            .route("/auth/login", post(login_handler))
            .route("/auth/logout", post(logout_handler))
            // Catalog
            .route("/dashboard", get(dashboard_handler))
            .route("/courses", get(list_courses_handler))
            .route("/courses/:id", get(course_handler))
            .route("/courses/:id/quiz/:level", get(quiz_handler))
            // Telemetry
            .route("/emotions", post(record_emotion_handler))
            .route("/progress", post(record_progress_handler))
            // Analytics
            .route("/recommendations", get(recommendations_handler))
            .route("/learning-state", get(learning_state_handler))
            // Health check
            .route("/health", get(health_handler))
            // State
            .with_state(state)
            // Middleware
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start serving with dynamic port allocation
    ///
    /// Tries the configured address first, then attempts alternative ports
    /// if the primary port is unavailable (e.g. a second instance running).
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = Self::build_router(self.state.clone());

        match tokio::net::TcpListener::bind(self.config.addr).await {
            Ok(listener) => {
                info!("API server listening on http://{}", self.config.addr);
                axum::serve(listener, router).await?;
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                debug!(
                    "Port {} in use, trying alternative ports...",
                    self.config.addr.port()
                );
            }
            Err(e) => return Err(e.into()),
        }

        let base_port = self.config.addr.port();
        for offset in 1..=10 {
            let alt_port = base_port + offset;
            let alt_addr = SocketAddr::new(self.config.addr.ip(), alt_port);

            match tokio::net::TcpListener::bind(alt_addr).await {
                Ok(listener) => {
                    info!("API server listening on http://{}", alt_addr);
                    axum::serve(listener, router).await?;
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(anyhow::anyhow!(
            "All ports ({}-{}) are in use. API server unavailable.",
            base_port,
            base_port + 10
        ))
    }
}

/// JSON error body returned by every failing handler
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for MathesisError {
    fn into_response(self) -> Response {
        let status = match &self {
            MathesisError::UserNotFound(_) | MathesisError::CourseNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            MathesisError::AccountExists(_) => StatusCode::CONFLICT,
            MathesisError::InvalidCredentials | MathesisError::InvalidSession(_) => {
                StatusCode::UNAUTHORIZED
            }
            MathesisError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the bearer token on a request to a user id
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserId> {
    let token = bearer_token(headers)
        .ok_or_else(|| MathesisError::InvalidSession("missing bearer token".to_string()))?;

    state
        .sessions
        .resolve(token)
        .await
        .ok_or_else(|| MathesisError::InvalidSession("unknown or revoked token".to_string()))
}

#[derive(Debug, Deserialize)]
struct SignupRequest {
    username: String,
    email: Option<String>,
    #[serde(default)]
    password: String,
    #[serde(default)]
    guest: bool,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user: UserAccount,
}

async fn signup_handler(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if req.username.trim().is_empty() {
        return Err(MathesisError::Validation(
            "username must not be empty".to_string(),
        ));
    }
    if !req.guest && req.password.is_empty() {
        return Err(MathesisError::Validation(
            "password must not be empty for non-guest accounts".to_string(),
        ));
    }

    let user = state
        .store
        .create_user(&NewUser {
            username: req.username,
            email: req.email,
            password: req.password,
            is_guest: req.guest,
        })
        .await?;

    let token = state.sessions.create(user.id).await;
    info!(user_id = %user.id, guest = user.is_guest, "account created");

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = state
        .store
        .verify_credentials(&req.email, &req.password)
        .await?
        .ok_or(MathesisError::InvalidCredentials)?;

    let token = state.sessions.create(user.id).await;
    debug!(user_id = %user.id, "login succeeded");

    Ok(Json(AuthResponse { token, user }))
}

#[derive(Debug, Serialize)]
struct LogoutResponse {
    revoked: bool,
}

async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| MathesisError::InvalidSession("missing bearer token".to_string()))?;

    let revoked = state.sessions.revoke(token).await;
    Ok(Json(LogoutResponse { revoked }))
}

/// Profile, catalog, and progress in one payload
#[derive(Debug, Serialize)]
struct DashboardResponse {
    user: UserAccount,
    languages: Vec<ProgrammingLanguage>,
    courses: Vec<Course>,
    progress: ProgressSnapshot,
}

async fn dashboard_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>> {
    let user_id = authenticate(&state, &headers).await?;

    let user = state.store.user_by_id(user_id).await?;
    let languages = state.store.list_languages().await?;
    let courses = state.store.list_courses().await?;
    let progress = state.store.progress_snapshot(user_id).await?;

    Ok(Json(DashboardResponse {
        user,
        languages,
        courses,
        progress,
    }))
}

async fn list_courses_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Course>>> {
    authenticate(&state, &headers).await?;
    Ok(Json(state.store.list_courses().await?))
}

async fn course_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(course_id): Path<i64>,
) -> Result<Json<Course>> {
    authenticate(&state, &headers).await?;
    Ok(Json(state.store.course_by_id(CourseId(course_id)).await?))
}

async fn quiz_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((course_id, level)): Path<(i64, String)>,
) -> Result<Json<Vec<QuizQuestion>>> {
    authenticate(&state, &headers).await?;

    let level = Difficulty::parse(&level)
        .ok_or_else(|| MathesisError::Validation(format!("unknown difficulty level: {}", level)))?;

    Ok(Json(
        state.store.quiz_questions(CourseId(course_id), level).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct RecordEmotionRequest {
    /// Label is stored verbatim; unknown labels are tolerated
    emotion: String,
    /// Defaults to now when the client sends no timestamp
    timestamp: Option<DateTime<Utc>>,
}

async fn record_emotion_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RecordEmotionRequest>,
) -> Result<(StatusCode, Json<EmotionObservation>)> {
    let user_id = authenticate(&state, &headers).await?;

    if req.emotion.trim().is_empty() {
        return Err(MathesisError::Validation(
            "emotion label must not be empty".to_string(),
        ));
    }

    let observation = EmotionObservation {
        emotion: EmotionLabel::new(req.emotion),
        timestamp: req.timestamp.unwrap_or_else(Utc::now),
    };

    state
        .store
        .save_emotion(user_id, &observation.emotion, observation.timestamp)
        .await?;

    Ok((StatusCode::CREATED, Json(observation)))
}

#[derive(Debug, Deserialize)]
struct RecordProgressRequest {
    course_id: i64,
    topic: String,
    /// "started" or "completed"
    status: String,
}

async fn record_progress_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RecordProgressRequest>,
) -> Result<(StatusCode, Json<ProgressSnapshot>)> {
    let user_id = authenticate(&state, &headers).await?;

    let status = TopicStatus::parse(&req.status)
        .ok_or_else(|| MathesisError::Validation(format!("unknown topic status: {}", req.status)))?;
    if req.topic.trim().is_empty() {
        return Err(MathesisError::Validation(
            "topic must not be empty".to_string(),
        ));
    }

    // Unknown course ids surface as 404 before any write happens.
    let course = state.store.course_by_id(CourseId(req.course_id)).await?;
    state
        .store
        .save_progress(user_id, course.id, &req.topic, status)
        .await?;

    let snapshot = state.store.progress_snapshot(user_id).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn recommendations_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LearningPlan>> {
    let user_id = authenticate(&state, &headers).await?;
    Ok(Json(state.engine.recommend(user_id).await?))
}

#[derive(Debug, Deserialize)]
struct LearningStateQuery {
    /// Accepted for API compatibility; the classifier ignores it
    #[serde(default = "default_duration_minutes")]
    duration_minutes: u32,
}

fn default_duration_minutes() -> u32 {
    30
}

#[derive(Debug, Serialize)]
struct LearningStateResponse {
    state: LearningState,
}

async fn learning_state_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LearningStateQuery>,
) -> Result<Json<LearningStateResponse>> {
    let user_id = authenticate(&state, &headers).await?;

    let learning_state = state
        .engine
        .learning_state(user_id, query.duration_minutes)
        .await?;

    Ok(Json(LearningStateResponse {
        state: learning_state,
    }))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    active_sessions: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.sessions.active_count().await,
    })
}
