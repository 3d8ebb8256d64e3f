use serde::{Deserialize, Serialize};

use super::enums::Severity;

/// One structured extraction per patient turn.
///
/// Built by `pipeline::parser` from the model's JSON reply and appended to
/// the session's record list; never mutated or removed afterwards. The full
/// list is what the report writer receives at the end of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalRecord {
    /// Chief complaint in clinical terms.
    pub motive: String,
    /// Detected symptoms, in the order the model listed them.
    pub symptoms: Vec<String>,
    pub severity: Severity,
    /// Whether the model recommends in-person care.
    pub referral_needed: bool,
    /// Maps search query for nearby care, when a referral is recommended.
    /// Non-empty whenever `referral_needed` is true per the model contract;
    /// the interpreter checks rather than trusts this.
    pub referral_query: Option<String>,
    /// Patient-facing reply text, verbatim.
    pub patient_reply: String,
}
