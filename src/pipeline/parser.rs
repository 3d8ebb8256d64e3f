//! Parse the model's triage reply into a [`TechnicalRecord`].
//!
//! The model is instructed to answer with bare JSON, but replies sometimes
//! arrive wrapped in a markdown fence or with prose around the object.
//! Parsing therefore tries the raw text first and falls back to the
//! substring between the first `{` and the last `}`.

use serde::Deserialize;

use super::TriageError;
use crate::models::{Severity, TechnicalRecord};

/// Wire shape of one triage reply. Only `respuesta_paciente` is required;
/// everything else carries a documented default.
#[derive(Deserialize, Default)]
struct RawReply {
    traduccion_medica: Option<RawTranslation>,
    derivacion: Option<RawReferral>,
    respuesta_paciente: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawTranslation {
    motivo: Option<String>,
    sintomas: Option<Vec<String>>,
    gravedad: Option<Severity>,
}

#[derive(Deserialize, Default)]
struct RawReferral {
    necesaria: Option<bool>,
    query_maps: Option<String>,
}

/// Validate one model reply into a technical record.
///
/// Defaults: missing `traduccion_medica` → empty motive/symptoms and `Baja`
/// severity; missing `derivacion` → no referral. An unrecognized severity
/// label fails the whole parse.
pub fn parse_triage_reply(reply: &str) -> Result<TechnicalRecord, TriageError> {
    let raw = extract_json(reply)?;

    let patient_reply = raw
        .respuesta_paciente
        .filter(|s| !s.trim().is_empty())
        .ok_or(TriageError::MissingField("respuesta_paciente"))?;

    let translation = raw.traduccion_medica.unwrap_or_default();
    let referral = raw.derivacion.unwrap_or_default();

    Ok(TechnicalRecord {
        motive: translation.motivo.unwrap_or_default(),
        symptoms: translation.sintomas.unwrap_or_default(),
        severity: translation.gravedad.unwrap_or_default(),
        referral_needed: referral.necesaria.unwrap_or(false),
        referral_query: referral.query_maps.filter(|q| !q.trim().is_empty()),
        patient_reply,
    })
}

fn extract_json(reply: &str) -> Result<RawReply, TriageError> {
    let trimmed = reply.trim();

    let direct = serde_json::from_str::<RawReply>(trimmed);
    if let Ok(raw) = direct {
        return Ok(raw);
    }

    // Fenced or prose-wrapped reply: take the outermost object.
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return serde_json::from_str(&trimmed[start..=end])
                .map_err(|e| TriageError::MalformedReply(e.to_string()));
        }
    }

    Err(TriageError::MalformedReply(
        "no JSON object in reply".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPLY: &str = r#"{
        "traduccion_medica": {
            "motivo": "chest pain",
            "sintomas": ["chest pain", "dyspnea"],
            "gravedad": "Emergencia Vital"
        },
        "derivacion": { "necesaria": true, "query_maps": "Hospital Emergency near me" },
        "respuesta_paciente": "Please seek immediate care."
    }"#;

    #[test]
    fn parses_bare_json() {
        let record = parse_triage_reply(FULL_REPLY).unwrap();
        assert_eq!(record.motive, "chest pain");
        assert_eq!(record.symptoms, vec!["chest pain", "dyspnea"]);
        assert_eq!(record.severity, Severity::VitalEmergency);
        assert!(record.referral_needed);
        assert_eq!(
            record.referral_query.as_deref(),
            Some("Hospital Emergency near me")
        );
        assert_eq!(record.patient_reply, "Please seek immediate care.");
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("```json\n{FULL_REPLY}\n```");
        let record = parse_triage_reply(&fenced).unwrap();
        assert_eq!(record.severity, Severity::VitalEmergency);
    }

    #[test]
    fn parses_prose_wrapped_json() {
        let wrapped = format!("Aquí tiene la evaluación:\n{FULL_REPLY}\nCuídese.");
        let record = parse_triage_reply(&wrapped).unwrap();
        assert!(record.referral_needed);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let record =
            parse_triage_reply(r#"{"respuesta_paciente": "Descanse y beba agua."}"#).unwrap();
        assert_eq!(record.motive, "");
        assert!(record.symptoms.is_empty());
        assert_eq!(record.severity, Severity::Low);
        assert!(!record.referral_needed);
        assert!(record.referral_query.is_none());
    }

    #[test]
    fn missing_gravedad_defaults_to_low() {
        let record = parse_triage_reply(
            r#"{
                "traduccion_medica": { "motivo": "cefalea", "sintomas": ["headache"] },
                "respuesta_paciente": "Tome un analgésico suave."
            }"#,
        )
        .unwrap();
        assert_eq!(record.severity, Severity::Low);
    }

    #[test]
    fn empty_query_maps_becomes_none() {
        let record = parse_triage_reply(
            r#"{
                "derivacion": { "necesaria": true, "query_maps": "   " },
                "respuesta_paciente": "Consulte a su médico."
            }"#,
        )
        .unwrap();
        assert!(record.referral_needed);
        assert!(record.referral_query.is_none());
    }

    #[test]
    fn missing_patient_reply_is_an_error() {
        let err = parse_triage_reply(r#"{"traduccion_medica": {"motivo": "x"}}"#).unwrap_err();
        assert!(matches!(
            err,
            TriageError::MissingField("respuesta_paciente")
        ));
    }

    #[test]
    fn blank_patient_reply_is_an_error() {
        let err = parse_triage_reply(r#"{"respuesta_paciente": "  "}"#).unwrap_err();
        assert!(matches!(err, TriageError::MissingField(_)));
    }

    #[test]
    fn unknown_severity_label_fails_the_parse() {
        let err = parse_triage_reply(
            r#"{
                "traduccion_medica": { "gravedad": "Critical" },
                "respuesta_paciente": "x"
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, TriageError::MalformedReply(_)));
    }

    #[test]
    fn non_json_reply_is_an_error() {
        let err = parse_triage_reply("Lo siento, no puedo ayudar con eso.").unwrap_err();
        assert!(matches!(err, TriageError::MalformedReply(_)));
    }

    #[test]
    fn truncated_json_is_an_error() {
        let err = parse_triage_reply(r#"{"respuesta_paciente": "hola"#).unwrap_err();
        assert!(matches!(err, TriageError::MalformedReply(_)));
    }
}
