//! Session lifecycle endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::core_state::CoreState;
use crate::models::VisibleMessage;

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub greeting: VisibleMessage,
}

/// `POST /api/sessions` — open a fresh triage session.
pub async fn create(
    State(core): State<Arc<CoreState>>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let handle = core.create_session()?;
    let session = handle.lock().await;
    tracing::info!(session = %session.id, "triage session opened");

    let greeting = session
        .messages()
        .first()
        .cloned()
        .ok_or_else(|| ApiError::Internal("session created without greeting".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id.to_string(),
            greeting,
        }),
    ))
}

#[derive(Serialize)]
pub struct MessageLog {
    pub messages: Vec<VisibleMessage>,
    pub record_count: usize,
}

/// `GET /api/sessions/:id/messages` — the full visible chat log.
pub async fn messages(
    State(core): State<Arc<CoreState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageLog>, ApiError> {
    let handle = core.session(id)?;
    let session = handle.lock().await;
    Ok(Json(MessageLog {
        messages: session.messages().to_vec(),
        record_count: session.records().len(),
    }))
}

/// `DELETE /api/sessions/:id` — destroy the session and everything in it.
pub async fn delete(
    State(core): State<Arc<CoreState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if core.remove_session(id)? {
        tracing::info!(session = %id, "triage session destroyed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound)
    }
}
