//! HTTP API for educators to inspect and change the assistant at runtime.
//!
//! # Endpoints
//!
//! - `GET /api/config` - Current configuration, modes and materials
//! - `POST /api/config` - Apply a partial configuration update
//! - `POST /api/materials/reload` - Re-scan the materials directory
//! - `GET /api/prompt` - The composed system prompt as plain text
//!
//! # Example
//!
//! ```no_run
//! use spark_assistant::{create_router, AppState, Config};
//!
//! # async fn example() -> std::io::Result<()> {
//! let router = create_router(AppState::new(Config::default()));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:7860").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::{Config, ConfigUpdate};
use crate::materials::{self, MaterialsSummary};
use crate::mode::{Mode, TeachingStyle};
use crate::prompt::{self, ConversationLog};
use crate::store::ConfigStore;

// ============================================================================
// Response Types
// ============================================================================

/// Label and description of one mode, for pickers.
#[derive(Debug, Clone, Serialize)]
pub struct ModeInfo {
    /// Mode key.
    pub key: Mode,
    /// Human-readable label.
    pub label: &'static str,
    /// One-line description.
    pub description: &'static str,
}

impl From<Mode> for ModeInfo {
    fn from(mode: Mode) -> Self {
        Self {
            key: mode,
            label: mode.label(),
            description: mode.description(),
        }
    }
}

/// Response body for `GET /api/config`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    /// The live configuration.
    #[serde(flatten)]
    pub config: Config,
    /// Every available mode.
    pub modes: Vec<ModeInfo>,
    /// Files currently visible to each mode.
    pub materials: MaterialsSummary,
}

/// The fields echoed back after an update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    /// Active mode.
    pub mode: Mode,
    /// Active teaching style.
    pub teaching_style: TeachingStyle,
    /// Course name.
    pub course_name: String,
}

/// Response body for `POST /api/config`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateConfigResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// The configuration after the update.
    pub config: ConfigSummary,
}

/// Response body for `POST /api/materials/reload`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Files per mode after the re-scan.
    pub materials: MaterialsSummary,
    /// When the re-scan finished.
    pub reloaded_at: DateTime<Utc>,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live configuration.
    pub store: ConfigStore,
    /// Conversation whose system prompt follows configuration changes.
    pub conversation: Arc<Mutex<ConversationLog>>,
}

impl AppState {
    /// Creates a state whose conversation starts with the prompt for `config`.
    ///
    /// Reads the course materials once to compose that prompt.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let system_prompt = prompt::compose(&config);
        Self {
            store: ConfigStore::new(config),
            conversation: Arc::new(Mutex::new(ConversationLog::new(system_prompt))),
        }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// Background work on the blocking pool did not complete.
    Blocking(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Blocking(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

/// Runs filesystem-bound work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!(error = %e, "Blocking task failed");
        ApiError::Blocking(format!("background task failed: {e}"))
    })
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints and request tracing.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/config", get(handle_get_config).post(handle_update_config))
        .route("/materials/reload", post(handle_reload_materials))
        .route("/prompt", get(handle_prompt));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for `GET /api/config`.
async fn handle_get_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConfigResponse>, ApiError> {
    let config = state.store.snapshot();
    let root = config.materials_dir.clone();
    let materials = blocking(move || materials::summary(&root)).await?;

    Ok(Json(ConfigResponse {
        config: Config::clone(&config),
        modes: Mode::ALL.into_iter().map(ModeInfo::from).collect(),
        materials,
    }))
}

/// Handler for `POST /api/config`.
///
/// Applies the update, recomposes the prompt and swaps it into the shared
/// conversation. The conversation lock is held for the whole sequence so
/// updates land in the same order in the store and in the system prompt.
async fn handle_update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<UpdateConfigResponse>, ApiError> {
    let mut conversation = state.conversation.lock().await;
    let config = state.store.update(&update);

    let for_prompt = Arc::clone(&config);
    let system_prompt = blocking(move || prompt::compose(&for_prompt)).await?;
    conversation.refresh_system_prompt(system_prompt);
    drop(conversation);

    Ok(Json(UpdateConfigResponse {
        status: "ok",
        config: ConfigSummary {
            mode: config.mode,
            teaching_style: config.teaching_style,
            course_name: config.course_name.clone(),
        },
    }))
}

/// Handler for `POST /api/materials/reload`.
async fn handle_reload_materials(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let root = state.store.snapshot().materials_dir.clone();
    let materials = blocking(move || materials::summary(&root)).await?;
    info!(files = materials.total_files(), "Materials reloaded");

    Ok(Json(ReloadResponse {
        status: "ok",
        materials,
        reloaded_at: Utc::now(),
    }))
}

/// Handler for `GET /api/prompt`.
async fn handle_prompt(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    let config = state.store.snapshot();
    blocking(move || prompt::compose(&config)).await
}
