use super::state::AppState;
use crate::session::SessionId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SessionDetail {
    pub id: String,
    pub label: String,
    /// The saved title, if any; clients should prompt for one when absent
    pub title: Option<String>,
    pub needs_title: bool,
    pub transcript: String,
}

#[derive(Debug, Deserialize)]
pub struct SetTitleRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct SetTitleResponse {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn not_found(id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", id),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /sessions
/// List saved sessions, newest first
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list() {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => {
            error!("Failed to list sessions: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list sessions: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions/:session_id
/// Title and transcript for one saved session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let id: SessionId = match session_id.parse() {
        Ok(id) => id,
        Err(_) => return not_found(&session_id),
    };

    if !state.store.exists(id) {
        return not_found(&session_id);
    }

    let title = match state.store.load_title(id) {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to load title for {}: {}", id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load title: {}", e),
                }),
            )
                .into_response();
        }
    };

    let transcript = match state.store.load_transcript(id) {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to load transcript for {}: {}", id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load transcript: {}", e),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(SessionDetail {
            id: id.dir_name(),
            label: id.label(),
            needs_title: title.is_none(),
            title,
            transcript,
        }),
    )
        .into_response()
}

/// PUT /sessions/:session_id/title
/// One-time title addition for a saved session
pub async fn set_title(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<SetTitleRequest>,
) -> impl IntoResponse {
    let id: SessionId = match session_id.parse() {
        Ok(id) => id,
        Err(_) => return not_found(&session_id),
    };

    if !state.store.exists(id) {
        return not_found(&session_id);
    }

    // Titles are write-once
    match state.store.load_title(id) {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Session {} already has a title", id),
                }),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to load title for {}: {}", id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load title: {}", e),
                }),
            )
                .into_response();
        }
    }

    if let Err(e) = state.store.save_title(id, &req.title) {
        error!("Failed to save title for {}: {}", id, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to save title: {}", e),
            }),
        )
            .into_response();
    }

    info!("Title saved for session {}", id);

    (
        StatusCode::OK,
        Json(SetTitleResponse {
            id: id.dir_name(),
            title: req.title,
        }),
    )
        .into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
