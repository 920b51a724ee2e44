//! Parameter extraction
//!
//! Each parameterised action has a narrow question that asks the completion
//! service for a single JSON object. Whatever comes back is parsed strictly;
//! anything unusable degrades to an empty parameter map so the caller always
//! has something to forward.

use std::sync::Arc;

use device_client::{Action, Params};
use serde_json::Value;
use tracing::{debug, warn};

use crate::brain::{CompletionBackend, CompletionRequest, SamplingPreset, frame_prompt};

const EXTRACTION_SYSTEM_PROMPT: &str = "You extract parameters for phone commands. \
Reply with ONLY one raw JSON object on a single line. No markdown. No backticks. \
No explanation. Use an empty string for any value the message does not give.";

/// Question asked of the completion service for one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionTemplate {
    pub action: Action,
    /// Question with a `{text}` placeholder for the user's message
    pub question: &'static str,
    /// Example of the expected answer, shown to the model verbatim
    pub schema: &'static str,
}

impl ExtractionTemplate {
    /// Full prompt for this template with `text` substituted in
    pub fn render(&self, text: &str) -> String {
        let user = format!(
            "{}\nAnswer format: {}",
            self.question.replace("{text}", text.trim()),
            self.schema
        );
        frame_prompt(EXTRACTION_SYSTEM_PROMPT, &user)
    }

    /// Field names the answer is expected to carry
    pub fn fields(&self) -> Vec<String> {
        serde_json::from_str::<serde_json::Map<String, Value>>(self.schema)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }
}

const TEMPLATES: &[ExtractionTemplate] = &[
    ExtractionTemplate {
        action: Action::SetAlarm,
        question: "What time should the alarm be set for in this message: \"{text}\"",
        schema: r#"{"time": "7:00 AM"}"#,
    },
    ExtractionTemplate {
        action: Action::SendSms,
        question: "Who should the text message go to, and what should it say, in this message: \"{text}\"",
        schema: r#"{"to": "John", "message": "I'll be late"}"#,
    },
    ExtractionTemplate {
        action: Action::PlayMedia,
        question: "What should be played in this message: \"{text}\"",
        schema: r#"{"query": "lo-fi beats"}"#,
    },
    ExtractionTemplate {
        action: Action::SendEmail,
        question: "Who should the email go to, what is its subject, and what should the body say, in this message: \"{text}\"",
        schema: r#"{"to": "boss@work.com", "subject": "Sick day", "body": "I'm not feeling well today."}"#,
    },
    ExtractionTemplate {
        action: Action::AddCalendarReminder,
        question: "What is the reminder about, and when is it, in this message: \"{text}\"",
        schema: r#"{"title": "Dentist", "datetime": "Friday 3:00 PM"}"#,
    },
    ExtractionTemplate {
        action: Action::AddNote,
        question: "What should the note say in this message: \"{text}\"",
        schema: r#"{"content": "buy milk"}"#,
    },
];

/// Template for `action`, or `None` for parameterless actions
pub fn template_for(action: Action) -> Option<&'static ExtractionTemplate> {
    TEMPLATES.iter().find(|t| t.action == action)
}

/// Parse raw completion output into a parameter map.
///
/// Strips a surrounding markdown fence (with or without a language tag) and
/// a bare leading `json` tag, then requires the rest to be exactly one JSON
/// object. Returns `None` for anything else, including truncated output.
pub fn parse_params(raw: &str) -> Option<Params> {
    let mut body = raw.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // drop the language tag on the opening fence line
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
        body = body.trim();
        if let Some(inner) = body.strip_suffix("```") {
            body = inner.trim();
        }
    }

    if let Some(rest) = body.strip_prefix("json") {
        if rest.trim_start().starts_with('{') {
            body = rest.trim_start();
        }
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Turns a classified message into parameters for its action
#[derive(Clone)]
pub struct ParameterExtractor {
    backend: Arc<dyn CompletionBackend>,
}

impl ParameterExtractor {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Extract parameters for `action` from `text`. Never fails: any
    /// transport or parse problem yields an empty map.
    pub async fn extract(&self, action: Action, text: &str) -> Params {
        let Some(template) = template_for(action) else {
            debug!("{} takes no parameters", action);
            return Params::new();
        };

        let request = CompletionRequest::new(template.render(text), &SamplingPreset::EXTRACTION);
        let raw = match self.backend.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Parameter extraction for {} failed: {}", action, e);
                return Params::new();
            }
        };

        match parse_params(&raw) {
            Some(params) => {
                debug!("Extracted {} params: {:?}", action, params.keys().collect::<Vec<_>>());
                params
            }
            None => {
                warn!(
                    "Unusable extraction output for {}: {:?}",
                    action,
                    raw.chars().take(120).collect::<String>()
                );
                Params::new()
            }
        }
    }
}
