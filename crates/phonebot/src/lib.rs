//! # PhoneBot - chat-to-phone task router
//!
//! Turns a chat message into either a conversational reply or a command for
//! the phone. The pipeline is linear:
//!
//! ```text
//! text -> IntentClassifier -> Greeting      -> capabilities reply
//!                          -> Unclassified  -> ChatResponder -> reply (apology on failure)
//!                          -> Action        -> ParameterExtractor -> Forwarder -> device response
//! ```
//!
//! Nothing is kept between requests apart from the static rule, template and
//! alias tables.

pub mod auth;
pub mod brain;
pub mod config;
pub mod extract;
pub mod intent;
pub mod personality;
pub mod router;

#[cfg(test)]
mod intent_tests;
#[cfg(test)]
mod test_support;

pub use auth::Authorizer;
pub use brain::{
    CompletionBackend, CompletionError, CompletionRequest, LlamaClient, SamplingPreset,
};
pub use config::PhonebotConfig;
pub use device_client::{Action, Command, DeviceClientError, DeviceResponse, Forwarder, Params};
pub use extract::{ExtractionTemplate, ParameterExtractor};
pub use intent::{Intent, IntentClassifier, IntentRule};
pub use personality::ChatResponder;
pub use router::{CHAT_ACTION, CommandResponse, TaskError, TaskResponse, TaskRouter};
