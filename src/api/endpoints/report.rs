//! Referral-letter compilation and download.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::core_state::CoreState;
use crate::report::pdf::PDF_FILENAME;
use crate::report::compile_report;

#[derive(Serialize)]
pub struct ReportResponse {
    /// The model's letter text, for on-screen preview.
    pub preview: String,
    pub pdf_bytes: usize,
    pub generated_at: String,
}

/// `POST /api/sessions/:id/report` — compile the referral letter.
///
/// The artifact is cached on the session and fetched from
/// `GET /api/sessions/:id/report.pdf`; compiling again replaces it.
/// Compiling does not alter the chat state: the conversation can continue
/// afterwards.
pub async fn compile(
    State(core): State<Arc<CoreState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportResponse>, ApiError> {
    let handle = core.session(id)?;
    let mut session = handle.lock().await;

    let report = compile_report(session.records(), core.llm.as_ref()).await?;
    tracing::info!(session = %id, bytes = report.pdf.len(), "referral letter compiled");

    let response = ReportResponse {
        preview: report.text.clone(),
        pdf_bytes: report.pdf.len(),
        generated_at: report.generated_at.to_string(),
    };
    session.set_report(report);
    Ok(Json(response))
}

/// `GET /api/sessions/:id/report.pdf` — download the compiled letter.
pub async fn download(
    State(core): State<Arc<CoreState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let handle = core.session(id)?;
    let session = handle.lock().await;
    let report = session.report().ok_or(ApiError::NoReport)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{PDF_FILENAME}\""),
            ),
        ],
        report.pdf.clone(),
    )
        .into_response())
}
