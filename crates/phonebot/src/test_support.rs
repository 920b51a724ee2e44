//! In-memory fakes for the completion service and the device endpoint

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use device_client::{AttemptFailure, Command, DeviceClientError, DeviceResponse, Forwarder};
use serde_json::json;

use crate::brain::{CompletionBackend, CompletionError, CompletionRequest};

/// Completion backend that plays back a fixed script and records requests
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    healthy: AtomicBool,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Backend that answers each call with the next reply in order
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Backend whose every call fails as if the service were down
    pub fn unreachable() -> Self {
        let backend = Self::new(Vec::new());
        backend.healthy.store(false, Ordering::SeqCst);
        backend
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(CompletionError::NotReachable {
                url: "http://fake-llama/completion".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::Empty))
    }

    async fn health(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

/// Forwarder that records commands and either echoes or fails
pub struct RecordingForwarder {
    commands: Mutex<Vec<Command>>,
    fail: bool,
}

impl RecordingForwarder {
    /// Every forward succeeds with `{"status": "ok", "action": <action>}`
    pub fn ok() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Every forward fails with two unreachable candidates
    pub fn failing() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forwarder for RecordingForwarder {
    async fn forward(&self, command: &Command) -> Result<DeviceResponse, DeviceClientError> {
        self.commands.lock().unwrap().push(command.clone());
        if self.fail {
            return Err(DeviceClientError::Unreachable {
                attempts: vec![
                    AttemptFailure {
                        candidate: "local".to_string(),
                        reason: "timed out after 2s".to_string(),
                    },
                    AttemptFailure {
                        candidate: "public".to_string(),
                        reason: "HTTP 502: bad gateway".to_string(),
                    },
                ],
            });
        }
        let mut response = DeviceResponse::new();
        response.insert("status".to_string(), json!("ok"));
        response.insert("action".to_string(), json!(command.action));
        Ok(response)
    }
}
