//! Rule-based intent classification
//!
//! Rules are an ordered list of `(pattern, action)` pairs and the first
//! matching rule wins. Narrow multi-word patterns sit above the broad
//! one-word ones, so "check my email notifications" is an email summary and
//! not a notifications read. Reordering the table changes what users get.

use device_client::Action;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Outcome of classifying a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Greeting or request for help: answer with the capability list
    Greeting,
    /// A device action to extract parameters for and forward
    Action(Action),
    /// Nothing matched: hand the text to the conversational fallback
    Unclassified,
}

/// Greetings only count at the very start of the message
static GREETING_REGEX: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(
        r"^\s*(?:hi|hello|hey|hiya|howdy|yo|greetings|good\s+(?:morning|afternoon|evening)|help|what\s+can\s+you\s+do)\b",
    )
    .case_insensitive(true)
    .build()
    .expect("valid greeting regex")
});

const DEFAULT_RULES: &[(&str, Action)] = &[
    (
        r"\b(?:read|check|summari[sz]e|show|any\s+new)\b[\w\s]{0,30}\b(?:e-?mails?|inbox)\b",
        Action::ReadEmailSummary,
    ),
    (
        r"\b(?:read|check|show)\b[\w\s]{0,30}\b(?:texts?|text\s+messages?|messages?|sms)\b",
        Action::ReadTextMessages,
    ),
    (
        r"\bset\s+(?:an?\s+|my\s+|the\s+)?alarm\b|\bwake\s+me\s+up\b",
        Action::SetAlarm,
    ),
    (
        r"\b(?:take|add|make|write)\s+(?:down\s+)?(?:a\s+)?note\b|\bjot\s+down\b",
        Action::AddNote,
    ),
    // must precede the send rules: "remind me to send ..." is a reminder
    (
        r"\bremind\s+me\b|\bset\s+(?:an?\s+|my\s+|the\s+)?reminder\b",
        Action::AddCalendarReminder,
    ),
    (
        r"\b(?:add|create|put|schedule)\b[\w\s]{0,25}\b(?:calendar|reminder|event|meeting|appointment)\b",
        Action::AddCalendarReminder,
    ),
    (
        r"\b(?:send|write|compose|draft)\b[\w\s]{0,30}\be-?mail\b",
        Action::SendEmail,
    ),
    (
        r"\b(?:send|text)\b[\w\s]{0,30}\b(?:text|sms|message)\b",
        Action::SendSms,
    ),
    // one-word fallbacks
    (r"\bplay\b", Action::PlayMedia),
    (r"\bnotifications?\b", Action::GetNotifications),
    (r"\balarm\b", Action::SetAlarm),
    (r"\be-?mail\b", Action::SendEmail),
    (r"\b(?:text|sms)\b", Action::SendSms),
    (r"\bnotes?\b", Action::AddNote),
    (
        r"\b(?:music|songs?|spotify|playlist|podcast)\b",
        Action::PlayMedia,
    ),
];

static DEFAULT_RULE_SET: Lazy<Vec<IntentRule>> = Lazy::new(|| {
    DEFAULT_RULES
        .iter()
        .map(|(pattern, action)| IntentRule::new(pattern, *action).expect("valid intent regex"))
        .collect()
});

/// One `(pattern, action)` pair. Patterns are case-insensitive and tested
/// anywhere in the text.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pattern: Regex,
    action: Action,
}

impl IntentRule {
    pub fn new(pattern: &str, action: Action) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { pattern, action })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// First-match-wins classifier over an ordered rule list
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl IntentClassifier {
    /// Classifier over `rules`, evaluated in the order given
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn classify(&self, text: &str) -> Intent {
        if GREETING_REGEX.is_match(text) {
            return Intent::Greeting;
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map(|rule| Intent::Action(rule.action))
            .unwrap_or(Intent::Unclassified)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULE_SET.clone())
    }
}
