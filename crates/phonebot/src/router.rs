//! Task orchestration
//!
//! [`TaskRouter`] is the single entry point for chat messages and raw
//! commands. Authorisation is checked before anything else runs.
//!
//! Failures are handled asymmetrically. A failure on the conversational path
//! still produces a reply (the apology text), while a recognised action whose
//! device cannot be reached is returned as [`TaskError::Device`] so the
//! operator sees the broken integration.

use std::sync::Arc;

use device_client::{Command, DeviceClientError, DeviceResponse, Forwarder, Params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    auth::Authorizer,
    brain::CompletionBackend,
    config::PhonebotConfig,
    extract::ParameterExtractor,
    intent::{Intent, IntentClassifier},
    personality::{APOLOGY_REPLY, CAPABILITIES_REPLY, ChatResponder},
};

/// Action reported for conversational replies
pub const CHAT_ACTION: &str = "chat";

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("text is required")]
    EmptyText,
    #[error("action is required")]
    MissingAction,
    #[error(transparent)]
    Device(#[from] DeviceClientError),
}

/// Outcome of handling one chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub ok: bool,
    /// Public action name, or `"chat"`
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_response: Option<DeviceResponse>,
}

impl TaskResponse {
    pub fn chat(reply: impl Into<String>) -> Self {
        Self {
            ok: true,
            action: CHAT_ACTION.to_string(),
            reply: Some(reply.into()),
            params: None,
            device_response: None,
        }
    }

    pub fn completed(
        action: impl Into<String>,
        params: Params,
        device_response: DeviceResponse,
    ) -> Self {
        Self {
            ok: true,
            action: action.into(),
            reply: None,
            params: Some(params),
            device_response: Some(device_response),
        }
    }
}

/// Outcome of a raw command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub ok: bool,
    pub action: String,
    pub device_response: DeviceResponse,
}

pub struct TaskRouter {
    authorizer: Authorizer,
    classifier: IntentClassifier,
    extractor: ParameterExtractor,
    chat: ChatResponder,
    forwarder: Arc<dyn Forwarder>,
    completion: Arc<dyn CompletionBackend>,
}

impl TaskRouter {
    pub fn new(
        authorizer: Authorizer,
        completion: Arc<dyn CompletionBackend>,
        forwarder: Arc<dyn Forwarder>,
    ) -> Self {
        Self {
            authorizer,
            classifier: IntentClassifier::default(),
            extractor: ParameterExtractor::new(completion.clone()),
            chat: ChatResponder::new(completion.clone()),
            forwarder,
            completion,
        }
    }

    pub fn from_config(config: &PhonebotConfig) -> Self {
        Self::new(
            config.authorizer(),
            Arc::new(config.llama_client()),
            Arc::new(config.device_client()),
        )
    }

    /// Replace the default rule table
    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    fn authorize(&self, identity: &str) -> Result<(), TaskError> {
        if self.authorizer.is_authorized(identity) {
            Ok(())
        } else {
            warn!("Rejected request from unauthorised identity");
            Err(TaskError::Unauthorized)
        }
    }

    /// Handle one chat message from `identity`
    pub async fn handle(&self, identity: &str, text: &str) -> Result<TaskResponse, TaskError> {
        self.authorize(identity)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }

        let intent = self.classifier.classify(text);
        info!("Classified message as {:?}", intent);

        match intent {
            Intent::Greeting => Ok(TaskResponse::chat(CAPABILITIES_REPLY)),
            Intent::Unclassified => {
                let reply = match self.chat.chat(text).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!("Conversational fallback failed: {}", e);
                        APOLOGY_REPLY.to_string()
                    }
                };
                Ok(TaskResponse::chat(reply))
            }
            Intent::Action(action) => {
                let params = self.extractor.extract(action, text).await;
                let command = Command::for_action(action, params.clone());
                let device_response = self.forwarder.forward(&command).await?;
                debug!("Device accepted {}", action);
                Ok(TaskResponse::completed(action.as_str(), params, device_response))
            }
        }
    }

    /// Forward `action` with `params` directly, bypassing classification
    pub async fn handle_command(
        &self,
        identity: &str,
        action: &str,
        params: Params,
    ) -> Result<CommandResponse, TaskError> {
        self.authorize(identity)?;

        let action = action.trim();
        if action.is_empty() {
            return Err(TaskError::MissingAction);
        }

        let command = Command::new(action, params);
        let device_response = self.forwarder.forward(&command).await?;
        Ok(CommandResponse {
            ok: true,
            action: action.to_string(),
            device_response,
        })
    }

    /// Whether the completion service answers its health probe
    pub async fn completion_healthy(&self) -> bool {
        self.completion.health().await
    }
}
