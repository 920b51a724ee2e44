//! Device Client - Interface to the phone-side device-control endpoint
//!
//! This crate provides a typed HTTP client for delivering commands to the
//! companion app running on the phone. It is used by:
//! - **Task router**: to forward recognised actions after parameter extraction
//! - **Raw command route**: to exercise the endpoint without classification
//!
//! # Architecture
//!
//! ```text
//! TaskRouter  -->  DeviceClient  -->  LAN address   (short timeout)
//!                  (this crate)  -->  public relay  (long timeout)
//! ```
//!
//! Candidates are tried strictly in order. The first one that answers with a
//! 2xx JSON body wins; its response is annotated with the candidate that
//! served it.

mod types;

pub use types::*;

use std::{fmt, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Timeout for the LAN candidate
pub const LOCAL_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for the public relay candidate
pub const PUBLIC_TIMEOUT: Duration = Duration::from_secs(15);

/// Error types for Device Client operations
#[derive(Debug, thiserror::Error)]
pub enum DeviceClientError {
    #[error("Device endpoint unreachable ({})", describe_attempts(.attempts))]
    Unreachable { attempts: Vec<AttemptFailure> },
}

impl DeviceClientError {
    /// Failed attempts, in the order they were made
    pub fn attempts(&self) -> &[AttemptFailure] {
        match self {
            DeviceClientError::Unreachable { attempts } => attempts,
        }
    }
}

fn describe_attempts(attempts: &[AttemptFailure]) -> String {
    if attempts.is_empty() {
        return "no candidate addresses configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Anything that can deliver a command to the device
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, command: &Command) -> Result<DeviceResponse, DeviceClientError>;
}

/// One address the device endpoint may be reachable at
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub label: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Fixed basic-auth credentials for the device endpoint
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Client for delivering commands to the device endpoint
#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: reqwest::Client,
    candidates: Vec<Candidate>,
    credentials: Option<Credentials>,
    simulate: bool,
}

impl DeviceClient {
    /// Create a client with no candidates; add them with [`DeviceClient::with_candidate`]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            candidates: Vec::new(),
            credentials: None,
            simulate: false,
        }
    }

    /// Append a candidate address. Empty addresses and addresses equal to an
    /// earlier candidate are skipped.
    pub fn with_candidate(
        mut self,
        label: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Self {
        let label = label.into();
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if base_url.is_empty() {
            debug!("Skipping {} device candidate: no address configured", label);
            return self;
        }
        if self.candidates.iter().any(|c| c.base_url == base_url) {
            debug!(
                "Skipping {} device candidate {}: duplicate of an earlier address",
                label, base_url
            );
            return self;
        }

        self.candidates.push(Candidate {
            label,
            base_url,
            timeout,
        });
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// In simulate mode no request leaves the process
    pub fn simulate(mut self, enabled: bool) -> Self {
        self.simulate = enabled;
        self
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn is_simulated(&self) -> bool {
        self.simulate
    }

    async fn try_candidate(
        &self,
        candidate: &Candidate,
        command: &Command,
    ) -> Result<DeviceResponse, String> {
        let mut request = self
            .client
            .post(format!("{}/command", candidate.base_url))
            .timeout(candidate.timeout)
            .json(command);

        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| describe_transport_error(&e, candidate.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("HTTP {}: {}", status.as_u16(), preview(&body, 200)));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                describe_transport_error(&e, candidate.timeout)
            } else {
                format!("invalid JSON response: {}", e)
            }
        })?;

        Ok(match body {
            serde_json::Value::Object(map) => map,
            other => {
                let mut map = DeviceResponse::new();
                map.insert("body".to_string(), other);
                map
            }
        })
    }
}

impl Default for DeviceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forwarder for DeviceClient {
    async fn forward(&self, command: &Command) -> Result<DeviceResponse, DeviceClientError> {
        let outbound = command.to_device();

        if self.simulate {
            info!("Simulate mode: acknowledging {} without contacting the device", outbound.action);
            return Ok(simulated_response(&outbound));
        }

        let mut attempts = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            debug!(
                "Forwarding {} to {} candidate {} (timeout {:?})",
                outbound.action, candidate.label, candidate.base_url, candidate.timeout
            );

            match self.try_candidate(candidate, &outbound).await {
                Ok(mut response) => {
                    response
                        .entry(FORWARDED_VIA_KEY)
                        .or_insert_with(|| serde_json::Value::String(candidate.base_url.clone()));
                    info!(
                        "Device accepted {} via {} candidate {}",
                        outbound.action, candidate.label, candidate.base_url
                    );
                    return Ok(response);
                }
                Err(reason) => {
                    warn!(
                        "Device {} candidate {} failed: {}",
                        candidate.label, candidate.base_url, reason
                    );
                    attempts.push(AttemptFailure {
                        candidate: candidate.base_url.clone(),
                        reason,
                    });
                }
            }
        }

        Err(DeviceClientError::Unreachable { attempts })
    }
}

fn simulated_response(command: &Command) -> DeviceResponse {
    let mut response = DeviceResponse::new();
    response.insert("status".into(), "simulated".into());
    response.insert("action".into(), command.action.clone().into());
    response.insert(
        "message".into(),
        format!("Simulated {} (device not contacted)", command.action).into(),
    );
    response.insert(FORWARDED_VIA_KEY.into(), "simulate".into());
    response
}

fn describe_transport_error(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!("timed out after {:?}", timeout)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        format!("request failed: {}", err)
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
