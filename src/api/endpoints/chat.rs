//! Patient turn submission.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::core_state::CoreState;
use crate::models::VisibleMessage;
use crate::pipeline::session::TECHNICAL_ERROR_TEXT;

#[derive(Deserialize)]
pub struct SendRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct SendResponse {
    pub reply: VisibleMessage,
    pub record_count: usize,
}

/// `POST /api/sessions/:id/messages` — submit one patient turn.
///
/// The session lock is held across the model round trip, so overlapping
/// submits for the same session queue and run in arrival order. An
/// uninterpretable model reply is recovered here: the placeholder error
/// bubble comes back with a 200 and the session stays usable.
pub async fn send(
    State(core): State<Arc<CoreState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let text = req.message.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".into()));
    }

    let handle = core.session(id)?;
    let mut session = handle.lock().await;

    let reply = match session.submit(core.llm.as_ref(), &text).await {
        Ok(message) => message,
        // Recovered: the session already appended (and logged) the placeholder.
        Err(_) => session
            .last_message()
            .cloned()
            .unwrap_or_else(|| VisibleMessage::technical_error(TECHNICAL_ERROR_TEXT)),
    };

    Ok(Json(SendResponse {
        reply,
        record_count: session.records().len(),
    }))
}
