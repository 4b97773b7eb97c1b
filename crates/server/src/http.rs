//! HTTP endpoints
//!
//! REST API for session management and chat.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use support_agent_agent::{AgentError, CreateOutcome};
use support_agent_core::Turn;

use crate::metrics::{metrics_handler, record_chat_latency, record_error, record_request};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = {
        let config = state.get_config();
        build_cors_layer(&config.server.cors_origins, config.server.cors_enabled)
    };

    Router::new()
        // Session endpoints
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/:name/turns", get(get_turns))
        // Chat endpoint
        .route("/api/chat", post(chat))
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins
///
/// Disabled CORS means permissive (development only). No configured origins
/// defaults to localhost:3000.
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        tracing::info!("no CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().expect("static origin"))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn error_response(err: ServerError) -> (StatusCode, Json<serde_json::Value>) {
    let message = err.to_string();
    (err.into(), Json(serde_json::json!({ "error": message })))
}

/// List all session names
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    record_request("list_sessions");
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    session_name: Option<String>,
}

/// Create a session
///
/// Creating an existing session reports back "already exists" instead of
/// failing, so clients can treat creation as idempotent.
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    record_request("create_session");

    let name = match request.session_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            record_error("missing_session_name");
            return error_response(ServerError::MissingSessionName);
        }
    };

    let message = match state.sessions.create(&name) {
        CreateOutcome::Created => format!("Session '{}' created successfully.", name),
        CreateOutcome::AlreadyExists => format!("Session '{}' already exists.", name),
    };

    (StatusCode::OK, Json(serde_json::json!({ "message": message })))
}

#[derive(Debug, Serialize)]
struct TurnBody {
    role: String,
    text: String,
}

impl From<&Turn> for TurnBody {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.to_string(),
            text: turn.text.clone(),
        }
    }
}

/// Get a session's turn history in chronological order
async fn get_turns(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    record_request("get_turns");

    let session = state.sessions.get(&name).map_err(|_| {
        record_error("unknown_session");
        error_response(ServerError::UnknownSession)
    })?;

    let turns: Vec<TurnBody> = session.turns().iter().map(TurnBody::from).collect();
    Ok(Json(serde_json::json!({ "turns": turns })))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    session_name: Option<String>,
    message: Option<String>,
}

/// Chat endpoint
///
/// A backend outage still yields a well-formed reply envelope; only client
/// mistakes (unknown session, missing message) surface as errors.
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    record_request("chat");
    let started = std::time::Instant::now();

    let session_name = match request.session_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            record_error("invalid_session");
            return error_response(ServerError::InvalidSession);
        }
    };

    let message = match request.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => {
            record_error("missing_message");
            return error_response(ServerError::MissingMessage);
        }
    };

    match state.agent.chat(&session_name, &message).await {
        Ok(reply) => {
            record_chat_latency(started.elapsed().as_millis() as f64);
            (StatusCode::OK, Json(serde_json::json!({ "reply": reply })))
        }
        Err(AgentError::UnknownSession(_)) => {
            record_error("invalid_session");
            error_response(ServerError::InvalidSession)
        }
        Err(err) => {
            // The agent converts pipeline failures into replies itself; this
            // arm is the last-resort envelope.
            tracing::error!(error = %err, "unexpected chat failure");
            record_error("internal");
            let reply = state.get_config().prompts.error_reply.clone();
            (StatusCode::OK, Json(serde_json::json!({ "reply": reply })))
        }
    }
}

/// Health check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.count(),
    }))
}
