//! Triage session: conversational continuity plus the append-only record
//! and message logs.
//!
//! A session is the only holder of patient data. It lives in the in-memory
//! registry and disappears with it; losing the history on shutdown is the
//! intended privacy property.

use uuid::Uuid;

use super::gemini::{ChatTurn, LlmChat};
use super::interpret::interpret;
use super::parser::parse_triage_reply;
use super::prompts::{GREETING, TRIAGE_ACK, TRIAGE_ACK_REQUEST, TRIAGE_SYSTEM_PROMPT};
use super::TriageError;
use crate::models::{TechnicalRecord, VisibleMessage};
use crate::report::CompiledReport;

/// Shown in place of an assistant reply when a turn cannot be interpreted.
pub const TECHNICAL_ERROR_TEXT: &str =
    "Lo siento, ha ocurrido un error técnico al procesar su mensaje. Inténtelo de nuevo.";

pub struct TriageSession {
    pub id: Uuid,
    pub started_at: chrono::NaiveDateTime,
    /// Model-visible conversation, seeded with the protocol acknowledgment.
    history: Vec<ChatTurn>,
    /// One entry per successfully interpreted turn. Append-only.
    records: Vec<TechnicalRecord>,
    /// The visible chat log. Append-only.
    messages: Vec<VisibleMessage>,
    /// Last compiled referral letter, kept for download.
    report: Option<CompiledReport>,
}

impl TriageSession {
    /// Open a fresh session: protocol seeded into the model history,
    /// greeting seeded into the visible log.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: chrono::Local::now().naive_local(),
            history: vec![
                ChatTurn::user(TRIAGE_ACK_REQUEST),
                ChatTurn::model(TRIAGE_ACK),
            ],
            records: Vec::new(),
            messages: vec![VisibleMessage::assistant(GREETING)],
            report: None,
        }
    }

    /// Process one patient turn.
    ///
    /// Appends the patient message, runs the model round trip, and on
    /// success appends both the technical record and the interpreted
    /// assistant message. On failure the record list and model history are
    /// left untouched; a placeholder error bubble keeps the chat log
    /// aligned, and the error is returned for logging.
    pub async fn submit(
        &mut self,
        llm: &dyn LlmChat,
        user_text: &str,
    ) -> Result<VisibleMessage, TriageError> {
        self.messages.push(VisibleMessage::patient(user_text));

        match self.turn(llm, user_text).await {
            Ok(message) => Ok(message),
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "triage turn failed");
                self.messages
                    .push(VisibleMessage::technical_error(TECHNICAL_ERROR_TEXT));
                Err(e)
            }
        }
    }

    async fn turn(
        &mut self,
        llm: &dyn LlmChat,
        user_text: &str,
    ) -> Result<VisibleMessage, TriageError> {
        let reply = llm
            .chat(TRIAGE_SYSTEM_PROMPT, &self.history, user_text)
            .await?;
        let record = parse_triage_reply(&reply)?;

        // The conversation only advances once the reply proved usable.
        self.history.push(ChatTurn::user(user_text));
        self.history.push(ChatTurn::model(reply));

        let message = interpret(&record);
        self.records.push(record);
        self.messages.push(message.clone());
        Ok(message)
    }

    pub fn messages(&self) -> &[VisibleMessage] {
        &self.messages
    }

    pub fn records(&self) -> &[TechnicalRecord] {
        &self.records
    }

    pub fn report(&self) -> Option<&CompiledReport> {
        self.report.as_ref()
    }

    pub fn set_report(&mut self, report: CompiledReport) {
        self.report = Some(report);
    }

    /// The last entry in the chat log. Never `None` after construction.
    pub fn last_message(&self) -> Option<&VisibleMessage> {
        self.messages.last()
    }
}

impl Default for TriageSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::pipeline::gemini::MockLlm;

    const EMERGENCY_REPLY: &str = r#"{
        "traduccion_medica": {
            "motivo": "chest pain",
            "sintomas": ["chest pain", "dyspnea"],
            "gravedad": "Emergencia Vital"
        },
        "derivacion": { "necesaria": true, "query_maps": "Hospital Emergency near me" },
        "respuesta_paciente": "Please seek immediate care."
    }"#;

    const MILD_REPLY: &str = r#"{
        "traduccion_medica": {
            "motivo": "cefalea",
            "sintomas": ["headache"],
            "gravedad": "Baja"
        },
        "derivacion": { "necesaria": false, "query_maps": "" },
        "respuesta_paciente": "Descanse y beba agua."
    }"#;

    /// Count assistant entries that carry a matching technical record.
    fn assistant_turns(session: &TriageSession) -> usize {
        session
            .messages()
            .iter()
            .skip(1) // greeting
            .filter(|m| m.role == Role::Assistant && !m.is_error)
            .count()
    }

    #[test]
    fn new_session_seeds_greeting_and_protocol() {
        let session = TriageSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, GREETING);
        assert_eq!(session.messages()[0].role, Role::Assistant);
        assert!(session.records().is_empty());
        assert!(session.report().is_none());
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[1].text, TRIAGE_ACK);
    }

    #[tokio::test]
    async fn successful_turn_appends_record_and_messages() {
        let llm = MockLlm::new(EMERGENCY_REPLY);
        let mut session = TriageSession::new();

        let message = session
            .submit(&llm, "I have chest pain and shortness of breath")
            .await
            .unwrap();

        assert!(message.is_emergency);
        assert_eq!(
            message.map_url.as_deref(),
            Some("https://www.google.com/maps/search/?api=1&query=Hospital%20Emergency%20near%20me")
        );

        // greeting + patient + assistant
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records().len(), assistant_turns(&session));
        // history grew by the user/model pair
        assert_eq!(session.history.len(), 4);
    }

    #[tokio::test]
    async fn mild_turn_has_no_link_and_no_emergency() {
        let llm = MockLlm::new(MILD_REPLY);
        let mut session = TriageSession::new();

        let message = session.submit(&llm, "I have a mild headache").await.unwrap();
        assert!(!message.is_emergency);
        assert!(message.map_url.is_none());
        assert_eq!(session.records()[0].severity, crate::models::Severity::Low);
    }

    #[tokio::test]
    async fn malformed_reply_drops_record_but_keeps_alignment() {
        let llm = MockLlm::new("Lo siento, no puedo responder en JSON.");
        let mut session = TriageSession::new();

        let err = session.submit(&llm, "hola").await.unwrap_err();
        assert!(matches!(err, TriageError::MalformedReply(_)));

        // greeting + patient + placeholder
        assert_eq!(session.messages().len(), 3);
        let placeholder = session.last_message().unwrap();
        assert!(placeholder.is_error);
        assert_eq!(placeholder.role, Role::Assistant);
        assert_eq!(placeholder.text, TECHNICAL_ERROR_TEXT);

        // no record, and the model history did not advance
        assert!(session.records().is_empty());
        assert_eq!(session.history.len(), 2);
        assert_eq!(assistant_turns(&session), 0);
    }

    #[tokio::test]
    async fn session_stays_usable_after_a_failed_turn() {
        let llm = MockLlm::with_queue(vec![
            "not json".to_string(),
            MILD_REPLY.to_string(),
        ]);
        let mut session = TriageSession::new();

        assert!(session.submit(&llm, "primer intento").await.is_err());
        let message = session.submit(&llm, "segundo intento").await.unwrap();
        assert!(!message.is_error);
        assert_eq!(session.records().len(), 1);
        assert_eq!(assistant_turns(&session), 1);
    }

    #[tokio::test]
    async fn connection_failure_is_recovered_the_same_way() {
        let llm = MockLlm::failing();
        let mut session = TriageSession::new();

        let err = session.submit(&llm, "hola").await.unwrap_err();
        assert!(matches!(err, TriageError::GeminiConnection(_)));
        assert!(session.last_message().unwrap().is_error);
        assert!(session.records().is_empty());
    }

    #[tokio::test]
    async fn records_accumulate_across_turns_in_order() {
        let llm = MockLlm::with_queue(vec![MILD_REPLY.to_string(), EMERGENCY_REPLY.to_string()]);
        let mut session = TriageSession::new();

        session.submit(&llm, "headache").await.unwrap();
        session.submit(&llm, "now chest pain").await.unwrap();

        assert_eq!(session.records().len(), 2);
        assert_eq!(session.records()[0].motive, "cefalea");
        assert_eq!(session.records()[1].motive, "chest pain");
        assert_eq!(assistant_turns(&session), 2);
    }
}
