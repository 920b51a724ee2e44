//! Completion service boundary
//!
//! Everything that talks to the text-completion backend goes through
//! [`CompletionBackend`]. The wire format of the backend varies between
//! llama.cpp, proxies and OpenAI-style servers; [`completion_text`] is the one
//! place that knows about those shapes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod llama;

pub use llama::{DEFAULT_LLAMA_URL, LlamaClient};

/// Error type for completion requests
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Completion service not reachable at {url}: {reason}")]
    NotReachable { url: String, reason: String },

    #[error("Completion service returned error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Failed to parse completion response: {0}")]
    ParseError(String),

    #[error("Completion service returned an empty response")]
    Empty,
}

/// Sampling settings for one kind of completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPreset {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    pub stop: &'static [&'static str],
}

impl SamplingPreset {
    /// Short, near-deterministic output that ends right after a JSON object
    pub const EXTRACTION: SamplingPreset = SamplingPreset {
        max_tokens: 96,
        temperature: 0.1,
        top_k: 10,
        top_p: 0.9,
        repeat_penalty: 1.1,
        stop: &["\n```", "\n\n", "### User:", "\n###"],
    };

    /// Free-form conversational prose
    pub const CHAT: SamplingPreset = SamplingPreset {
        max_tokens: 256,
        temperature: 0.7,
        top_k: 40,
        top_p: 0.95,
        repeat_penalty: 1.1,
        stop: &["### User:", "\n###"],
    };
}

/// Request body for the completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    pub stop: Vec<String>,
    pub cache_prompt: bool,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, preset: &SamplingPreset) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: preset.max_tokens,
            temperature: preset.temperature,
            top_k: preset.top_k,
            top_p: preset.top_p,
            repeat_penalty: preset.repeat_penalty,
            stop: preset.stop.iter().map(|s| s.to_string()).collect(),
            cache_prompt: true,
        }
    }
}

/// Anything that can turn a prompt into generated text
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Run one completion and return the generated text, trimmed
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    /// Whether the backend currently answers its health probe
    async fn health(&self) -> bool;
}

/// Wrap a system instruction and a user turn in the instruct framing the
/// local models are tuned on.
pub fn frame_prompt(system: &str, user: &str) -> String {
    format!(
        "### System:\n{}\n\n### User:\n{}\n\n### Assistant:\n",
        system.trim(),
        user.trim()
    )
}

/// Pull generated text out of any of the supported response shapes:
/// `content` (llama.cpp), `response` (proxies) or `choices[0].text`.
/// The first non-empty one wins.
pub fn completion_text(payload: &serde_json::Value) -> Option<String> {
    let candidates = [
        payload.get("content"),
        payload.get("response"),
        payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("text")),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}
