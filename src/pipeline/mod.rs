pub mod gemini;
pub mod interpret;
pub mod parser;
pub mod prompts;
pub mod session;

use thiserror::Error;

/// Failures while running a triage turn. All of them are recovered inside
/// the session (a placeholder bubble is shown and the chat stays usable);
/// none crash the session.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("model endpoint unreachable at {0}")]
    GeminiConnection(String),

    #[error("model returned error (status {status}): {body}")]
    GeminiError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("response envelope parsing error: {0}")]
    ResponseParsing(String),

    #[error("model reply is not a valid triage JSON: {0}")]
    MalformedReply(String),

    #[error("model reply lacks required field '{0}'")]
    MissingField(&'static str),
}
