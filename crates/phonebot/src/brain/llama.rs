//! llama.cpp-compatible completion client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{CompletionBackend, CompletionError, CompletionRequest, completion_text};

/// Default llama.cpp `/completion` endpoint
pub const DEFAULT_LLAMA_URL: &str = "http://localhost:8080/completion";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Client for a llama.cpp server (or anything that speaks its `/completion` API)
#[derive(Debug, Clone)]
pub struct LlamaClient {
    url: String,
    client: Client,
}

impl LlamaClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sibling `/health` URL of the completion endpoint
    pub fn health_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        match base.strip_suffix("/completion") {
            Some(root) => format!("{}/health", root),
            None => format!("{}/health", base),
        }
    }
}

impl Default for LlamaClient {
    fn default() -> Self {
        Self::new(DEFAULT_LLAMA_URL)
    }
}

#[async_trait]
impl CompletionBackend for LlamaClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let resp = self
            .client
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::NotReachable {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::ApiError { status, body });
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CompletionError::ParseError(e.to_string()))?;

        let text = completion_text(&payload).ok_or(CompletionError::Empty)?;

        tracing::debug!(
            "Completion from {} ({} chars): {:?}",
            self.url,
            text.len(),
            text.chars().take(120).collect::<String>()
        );

        Ok(text)
    }

    async fn health(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!("Completion service health probe failed: {}", e);
                false
            }
        }
    }
}
