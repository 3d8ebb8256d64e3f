use serde::{Deserialize, Serialize};

use super::enums::Role;

/// One chat-log entry as shown to the patient. Append-only: the log mirrors
/// technical records 1:1 for assistant turns, plus one entry per patient turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibleMessage {
    pub role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_label: Option<String>,
    #[serde(default)]
    pub is_emergency: bool,
    /// Marks the placeholder inserted when a turn could not be interpreted.
    /// Such entries keep patient/assistant turns aligned but have no
    /// matching technical record.
    #[serde(default)]
    pub is_error: bool,
}

impl VisibleMessage {
    pub fn patient(text: &str) -> Self {
        Self {
            role: Role::Patient,
            text: text.to_string(),
            map_url: None,
            map_label: None,
            is_emergency: false,
            is_error: false,
        }
    }

    pub fn assistant(text: &str) -> Self {
        Self {
            role: Role::Assistant,
            ..Self::patient(text)
        }
    }

    /// Placeholder for a turn whose model reply could not be interpreted.
    pub fn technical_error(text: &str) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(text)
        }
    }
}
