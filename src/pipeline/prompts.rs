//! Fixed prompt texts for the triage chat and the report writer.

/// System instruction for the triage conversation. The JSON shape below is
/// the wire contract `pipeline::parser` expects.
pub const TRIAGE_SYSTEM_PROMPT: &str = r#"Actúa como Dr. Hipócrates. Tu objetivo es calmar al paciente y extraer sus síntomas.
Responde SIEMPRE con un único objeto JSON, sin texto adicional:
{
  "traduccion_medica": { "motivo": "...", "sintomas": ["..."], "gravedad": "Baja|Media|Alta|Emergencia Vital" },
  "derivacion": { "necesaria": bool, "query_maps": "..." },
  "respuesta_paciente": "..."
}"#;

/// Canned model turn seeded into every new conversation, so the first real
/// reply already follows the contract.
pub const TRIAGE_ACK: &str = r#"{"respuesta_paciente": "Entendido. Soy el Dr. Hipócrates."}"#;

/// User turn paired with [`TRIAGE_ACK`]; the conversation history must
/// start with a user turn.
pub const TRIAGE_ACK_REQUEST: &str = "Confirme que seguirá el protocolo de triaje.";

/// First assistant bubble in a fresh session.
pub const GREETING: &str = "Buenos días. Soy el Dr. Hipócrates. Describa sus síntomas.";

/// Instruction for the referral-letter writer. Language selection is
/// delegated entirely to the model; there is no deterministic fallback.
pub const REPORT_PROMPT: &str = r#"Actúa como un Consultor Médico Senior. Tu tarea es recibir un log de datos JSON de un paciente y redactar una "CARTA DE DERIVACIÓN CLÍNICA" (Referral Letter) profesional.

OBJETIVO: Que el médico de urgencias o familia lea esto y entienda el caso en 30 segundos.

FORMATO DEL INFORME:
1.  **Cabecera:** Fecha, Hora y ID Anónimo.
2.  **Chief Complaint (Motivo de Consulta):** El síntoma principal técnico.
3.  **History of Present Illness (Anamnesis):** Narrativa cronológica basada en los datos recolectados.
4.  **Symptoms List:** Lista de síntomas detectados (usando terminología médica).
5.  **Assessment (Valoración):** Gravedad estimada y sugerencia de especialidad.
6.  **Nota:** Añade una nota indicando que este informe ha sido generado por IA (Dr. Hipócrates) y requiere validación humana.

IDIOMA:
Escribe el informe en INGLÉS MÉDICO INTERNACIONAL (Standard Medical English) para garantizar que sea legible en cualquier país, salvo que los datos indiquen claramente un país de habla hispana, en cuyo caso hazlo en Español."#;

/// Stitch the report instruction and the serialized record log together.
pub fn build_report_prompt(records_json: &str) -> String {
    format!("{REPORT_PROMPT}\n\nDATOS DEL PACIENTE:\n{records_json}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_prompt_states_the_wire_contract() {
        assert!(TRIAGE_SYSTEM_PROMPT.contains("traduccion_medica"));
        assert!(TRIAGE_SYSTEM_PROMPT.contains("derivacion"));
        assert!(TRIAGE_SYSTEM_PROMPT.contains("respuesta_paciente"));
        assert!(TRIAGE_SYSTEM_PROMPT.contains("Emergencia Vital"));
    }

    #[test]
    fn ack_is_contract_conforming_json() {
        let parsed: serde_json::Value = serde_json::from_str(TRIAGE_ACK).unwrap();
        assert!(parsed["respuesta_paciente"].is_string());
    }

    #[test]
    fn report_prompt_embeds_patient_data() {
        let prompt = build_report_prompt(r#"[{"motive":"chest pain"}]"#);
        assert!(prompt.starts_with(REPORT_PROMPT));
        assert!(prompt.contains("DATOS DEL PACIENTE"));
        assert!(prompt.contains("chest pain"));
    }
}
