//! Referral-letter compilation: records → model → PDF.

use crate::models::TechnicalRecord;
use crate::pipeline::gemini::LlmChat;
use crate::pipeline::prompts::build_report_prompt;

use super::pdf::render_report_pdf;
use super::ReportError;

/// A compiled referral letter: the model's text (kept for preview) and the
/// rendered document bytes.
#[derive(Debug, Clone)]
pub struct CompiledReport {
    pub text: String,
    pub pdf: Vec<u8>,
    pub generated_at: chrono::NaiveDateTime,
}

/// Ask the model for a referral letter over the collected records and render
/// it to a PDF.
///
/// Fails fast with [`ReportError::NoData`] on an empty record list, before
/// any network traffic. The model call is stateless; the record log itself
/// is the whole context.
pub async fn compile_report(
    records: &[TechnicalRecord],
    llm: &dyn LlmChat,
) -> Result<CompiledReport, ReportError> {
    if records.is_empty() {
        return Err(ReportError::NoData);
    }

    let records_json = serde_json::to_string_pretty(records)
        .map_err(|e| ReportError::GenerationFailed(format!("record serialization: {e}")))?;
    let prompt = build_report_prompt(&records_json);

    let text = llm
        .generate(&prompt)
        .await
        .map_err(|e| ReportError::GenerationFailed(e.to_string()))?;

    let pdf = render_report_pdf(&text)?;

    Ok(CompiledReport {
        text,
        pdf,
        generated_at: chrono::Local::now().naive_local(),
    })
}
