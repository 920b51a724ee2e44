//! Command vocabulary shared between the task router and the device endpoint
//!
//! Public action names are what the router reports back to chat clients.
//! The device endpoint predates some of those names, so a handful of actions
//! are renamed on the way out (see [`Action::device_name`]).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Parameters attached to a command
pub type Params = serde_json::Map<String, serde_json::Value>;

/// JSON object returned by the device endpoint
pub type DeviceResponse = serde_json::Map<String, serde_json::Value>;

/// Key added to every device response naming the candidate that served it
pub const FORWARDED_VIA_KEY: &str = "forwarded_via";

/// Device-control intents the router knows how to forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SetAlarm,
    SendSms,
    PlayMedia,
    SendEmail,
    GetNotifications,
    ReadTextMessages,
    ReadEmailSummary,
    AddCalendarReminder,
    AddNote,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::SetAlarm,
        Action::SendSms,
        Action::PlayMedia,
        Action::SendEmail,
        Action::GetNotifications,
        Action::ReadTextMessages,
        Action::ReadEmailSummary,
        Action::AddCalendarReminder,
        Action::AddNote,
    ];

    /// Public name, as reported in task responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SetAlarm => "set_alarm",
            Action::SendSms => "send_sms",
            Action::PlayMedia => "play_media",
            Action::SendEmail => "send_email",
            Action::GetNotifications => "get_notifications",
            Action::ReadTextMessages => "read_text_messages",
            Action::ReadEmailSummary => "read_email_summary",
            Action::AddCalendarReminder => "add_calendar_reminder",
            Action::AddNote => "add_note",
        }
    }

    /// Name the device endpoint expects for this action
    pub fn device_name(&self) -> &'static str {
        match self {
            Action::SetAlarm => "set_alarm",
            Action::SendSms => "send_sms",
            Action::PlayMedia => "play_spotify",
            Action::SendEmail => "send_email",
            Action::GetNotifications => "get_notifications",
            Action::ReadTextMessages => "read_sms",
            Action::ReadEmailSummary => "read_emails",
            Action::AddCalendarReminder => "create_calendar_event",
            Action::AddNote => "create_note",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    /// Accepts public names, device names and kebab-case spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized || a.device_name() == normalized)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// Map an action string to the device-facing name. Unknown actions pass
/// through unchanged.
pub fn device_action_name(action: &str) -> String {
    match action.parse::<Action>() {
        Ok(known) => known.device_name().to_string(),
        Err(_) => action.to_string(),
    }
}

/// A command as posted to `{base}/command`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub action: String,
    #[serde(default)]
    pub params: Params,
}

impl Command {
    pub fn new(action: impl Into<String>, params: Params) -> Self {
        Self {
            action: action.into(),
            params,
        }
    }

    pub fn for_action(action: Action, params: Params) -> Self {
        Self::new(action.as_str(), params)
    }

    /// Copy of this command with the action renamed for the device endpoint.
    /// Params are carried over untouched.
    pub fn to_device(&self) -> Command {
        Command {
            action: device_action_name(&self.action),
            params: self.params.clone(),
        }
    }
}

/// One failed delivery attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptFailure {
    pub candidate: String,
    pub reason: String,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.candidate, self.reason)
    }
}
