//! Prompt and annotation catalog
//!
//! Every fixed piece of text the pipeline sends to the completion backend or
//! injects into an augmented message lives here, so deployments can override
//! wording without a rebuild. Classifier templates use a `{message}`
//! placeholder substituted at call time.

use serde::{Deserialize, Serialize};

/// Catalog of prompt templates and canned annotations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptCatalog {
    /// Persona instructions sent as the system message on every completion
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Sentiment classification template
    #[serde(default = "default_sentiment_instruction")]
    pub sentiment_instruction: String,

    /// Intent classification template
    #[serde(default = "default_intent_instruction")]
    pub intent_instruction: String,

    /// Slot-extraction instruction sent as a system message
    #[serde(default = "default_extraction_instruction")]
    pub extraction_instruction: String,

    /// Annotation added when sentiment is negative
    #[serde(default = "default_escalation_notice")]
    pub escalation_notice: String,

    /// Annotation added when the intent is an explicit escalation request
    #[serde(default = "default_escalation_annotation")]
    pub escalation_annotation: String,

    /// Marker used when no knowledge-base passage matches
    #[serde(default = "default_no_match_marker")]
    pub no_match_marker: String,

    /// Reply returned when a backend call fails
    #[serde(default = "default_unavailable_reply")]
    pub unavailable_reply: String,

    /// Reply returned for any unexpected pipeline failure
    #[serde(default = "default_error_reply")]
    pub error_reply: String,
}

fn default_system_prompt() -> String {
    "You are a friendly, professional support assistant for the Harborview service desk. \
     Your main task is to give users accurate and clear information about our services, \
     including opening hours, accounts and registration, events and programs, and general \
     policies.\n\n\
     Additionally, you can assist with the following actions:\n\
     - Appointment booking: help users schedule consultations and service visits.\n\
     - Escalation to a human specialist: if a user has account issues, special requests, \
     or a serious complaint, escalate their request.\n\n\
     If the user asks for an appointment, confirm the details and acknowledge the booking. \
     If the user expresses strong frustration or confusion, offer to escalate to a specialist. \
     If you're unsure about something, ask for clarification or suggest the user contact \
     staff directly."
        .to_string()
}

fn default_sentiment_instruction() -> String {
    "Analyze the sentiment of this message and respond with either 'positive', \
     'neutral', or 'negative': {message}"
        .to_string()
}

fn default_intent_instruction() -> String {
    "Determine the intent of the following message and respond with one of these \
     categories only:\n\
     - appointment\n\
     - escalation\n\
     - general inquiry\n\n\
     User Message: {message}\n\n\
     Only return one of the categories without explanation."
        .to_string()
}

fn default_extraction_instruction() -> String {
    "Extract appointment details (date, time, and purpose) from the user's message. \
     Return only a JSON object in the format: {\"date\": \"\", \"time\": \"\", \"purpose\": \"\"}. \
     Leave a field empty when the message does not mention it."
        .to_string()
}

fn default_escalation_notice() -> String {
    "I sense you're having trouble. I'll escalate this to a support specialist for assistance."
        .to_string()
}

fn default_escalation_annotation() -> String {
    "I'll escalate this to a support specialist for further assistance.".to_string()
}

fn default_no_match_marker() -> String {
    "Sorry, I couldn't find a relevant answer.".to_string()
}

fn default_unavailable_reply() -> String {
    "Sorry, the assistant is temporarily unavailable. Please try again in a moment.".to_string()
}

fn default_error_reply() -> String {
    "Sorry, something went wrong while handling your message. Please try again.".to_string()
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            sentiment_instruction: default_sentiment_instruction(),
            intent_instruction: default_intent_instruction(),
            extraction_instruction: default_extraction_instruction(),
            escalation_notice: default_escalation_notice(),
            escalation_annotation: default_escalation_annotation(),
            no_match_marker: default_no_match_marker(),
            unavailable_reply: default_unavailable_reply(),
            error_reply: default_error_reply(),
        }
    }
}

impl PromptCatalog {
    /// Render the sentiment template for a message
    pub fn sentiment_prompt(&self, message: &str) -> String {
        self.sentiment_instruction.replace("{message}", message)
    }

    /// Render the intent template for a message
    pub fn intent_prompt(&self, message: &str) -> String {
        self.intent_instruction.replace("{message}", message)
    }
}
