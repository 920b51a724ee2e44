//! PhoneBot persona and the conversational fallback

use std::sync::Arc;

use tracing::debug;

use crate::brain::{
    CompletionBackend, CompletionError, CompletionRequest, SamplingPreset, frame_prompt,
};

/// Reply to greetings and requests for help
pub const CAPABILITIES_REPLY: &str = "Hi! I can help you with:
1) set_alarm - Set an alarm
2) send_sms - Send a text
3) play_media - Play music
4) send_email - Send an email
5) get_notifications - Read notifications
6) read_text_messages - Read your texts
7) read_email_summary - Summarise your inbox
8) add_calendar_reminder - Add a calendar reminder
9) add_note - Take a note
Which would you like?";

/// Reply used whenever the conversational fallback fails
pub const APOLOGY_REPLY: &str =
    "Sorry, I couldn't come up with a reply just now. Please try again in a moment.";

const PERSONA_PROMPT: &str = "You are PhoneBot, a small assistant that controls the user's phone. \
You can set alarms, send texts and emails, play music, read notifications, texts and emails, \
add calendar reminders and take notes. When the user asks for something else, answer briefly \
and helpfully in plain sentences. Keep replies under four sentences. \
Never use emoji, emoticons or any other pictographic symbols.";

/// Whether `c` is a pictograph, dingbat or one of their modifiers
fn is_pictographic(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF   // emoji, symbols and pictographs, flags
            | 0x2600..=0x27BF   // misc symbols and dingbats
            | 0x2300..=0x23FF   // misc technical (watch, hourglass)
            | 0x2B00..=0x2BFF   // arrows and stars
            | 0xFE00..=0xFE0F   // variation selectors
            | 0x200D            // zero width joiner
            | 0x20E3            // keycap
            | 0xE0020..=0xE007F // tag sequences
    )
}

fn is_inline_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Remove pictographic characters and trim the result.
///
/// Only the spacing around a removed glyph is touched: a glyph between two
/// words leaves a single separator, and one at the start or end of a line
/// leaves none. All other whitespace is kept as written.
pub fn strip_pictographs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if !is_pictographic(c) {
            out.push(c);
            continue;
        }

        // a sequence such as flag pairs or ZWJ families is one glyph run
        while chars.peek().is_some_and(|next| is_pictographic(*next)) {
            chars.next();
        }

        let at_line_start = out.is_empty() || out.ends_with('\n');
        if at_line_start || out.ends_with(is_inline_space) {
            while chars.peek().is_some_and(|next| is_inline_space(*next)) {
                chars.next();
            }
        }

        let at_line_end = chars.peek().map_or(true, |next| *next == '\n' || *next == '\r');
        if at_line_end {
            let kept = out.trim_end_matches(is_inline_space).len();
            out.truncate(kept);
        }
    }

    out.trim().to_string()
}

/// Free-form replies for messages that match no action
#[derive(Clone)]
pub struct ChatResponder {
    backend: Arc<dyn CompletionBackend>,
}

impl ChatResponder {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Ask the completion service for a reply to `text`.
    ///
    /// Fails on transport errors and on replies that are empty once
    /// pictographs are removed. Callers substitute [`APOLOGY_REPLY`].
    pub async fn chat(&self, text: &str) -> Result<String, CompletionError> {
        let request =
            CompletionRequest::new(frame_prompt(PERSONA_PROMPT, text), &SamplingPreset::CHAT);
        let raw = self.backend.complete(&request).await?;
        let reply = strip_pictographs(&raw);
        if reply.is_empty() {
            debug!("Chat reply was empty after cleanup");
            return Err(CompletionError::Empty);
        }
        Ok(reply)
    }
}
