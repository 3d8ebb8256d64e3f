//! Gemini `generateContent` HTTP client.
//!
//! One client instance is shared by every session. Triage turns send the
//! full conversation history; report generation is a single stateless call.
//! Both go through the object-safe [`LlmChat`] trait so handlers and tests
//! can swap in [`MockLlm`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::TriageError;
use crate::config::AppConfig;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// Low temperature keeps the triage JSON and the report sober.
const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 0.95;

/// One turn of model-visible conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Text generation as the triage pipeline needs it.
#[async_trait]
pub trait LlmChat: Send + Sync {
    /// Conversational turn: system instruction, prior turns, new user text.
    async fn chat(
        &self,
        system: &str,
        history: &[ChatTurn],
        user_text: &str,
    ) -> Result<String, TriageError>;

    /// Single stateless call with no history.
    async fn generate(&self, prompt: &str) -> Result<String, TriageError>;
}

/// HTTP client for the hosted Gemini endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(cfg: &AppConfig) -> Self {
        Self::with_base_url(BASE_URL, cfg)
    }

    /// Point the client at a non-default endpoint (tests).
    pub fn with_base_url(base_url: &str, cfg: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            timeout_secs: cfg.timeout_secs,
        }
    }

    async fn send(&self, body: &GenerateContentRequest) -> Result<String, TriageError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            if e.is_connect() {
                TriageError::GeminiConnection(self.base_url.clone())
            } else if e.is_timeout() {
                TriageError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                TriageError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriageError::GeminiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TriageError::ResponseParsing(e.to_string()))?;

        extract_text(parsed)
    }
}

#[async_trait]
impl LlmChat for GeminiClient {
    async fn chat(
        &self,
        system: &str,
        history: &[ChatTurn],
        user_text: &str,
    ) -> Result<String, TriageError> {
        let mut contents: Vec<Content> = history.iter().map(Content::from_turn).collect();
        contents.push(Content::user(user_text));

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::system(system)),
            generation_config: GenerationConfig::default(),
        };
        self.send(&request).await
    }

    async fn generate(&self, prompt: &str) -> Result<String, TriageError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: GenerationConfig::default(),
        };
        self.send(&request).await
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }

    fn system(text: &str) -> Self {
        Self {
            role: "system".to_string(),
            ..Self::user(text)
        }
    }

    fn from_turn(turn: &ChatTurn) -> Self {
        let role = match turn.role {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        };
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, TriageError> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            TriageError::ResponseParsing("no text in the response candidates".into())
        })
}

// ─── Mock client ──────────────────────────────────────────────────────────────

/// Mock LLM for tests: returns queued responses in order, then the fallback.
pub struct MockLlm {
    queue: std::sync::Mutex<std::collections::VecDeque<String>>,
    fallback: String,
    fail: bool,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockLlm {
    pub fn new(response: &str) -> Self {
        Self {
            queue: std::sync::Mutex::new(std::collections::VecDeque::new()),
            fallback: response.to_string(),
            fail: false,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Replies consumed in order; the last one becomes the fallback.
    pub fn with_queue(responses: Vec<String>) -> Self {
        let fallback = responses.last().cloned().unwrap_or_default();
        Self {
            queue: std::sync::Mutex::new(responses.into()),
            fallback,
            fail: false,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// A client whose every call fails with a connection error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn next(&self) -> Result<String, TriageError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail {
            return Err(TriageError::GeminiConnection("mock".into()));
        }
        let mut queue = self.queue.lock().expect("mock queue lock");
        Ok(queue.pop_front().unwrap_or_else(|| self.fallback.clone()))
    }
}

#[async_trait]
impl LlmChat for MockLlm {
    async fn chat(
        &self,
        _system: &str,
        _history: &[ChatTurn],
        _user_text: &str,
    ) -> Result<String, TriageError> {
        self.next()
    }

    async fn generate(&self, _prompt: &str) -> Result<String, TriageError> {
        self.next()
    }
}
