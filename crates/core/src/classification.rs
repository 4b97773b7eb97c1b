//! Closed classification label sets
//!
//! Sentiment and intent are closed enumerations. Parsing is lenient about
//! whitespace and casing but strict about membership; callers decide how to
//! fall back when a label is outside the set.

use serde::{Deserialize, Serialize};

/// Sentiment of a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Parse a raw classifier label. Returns `None` for anything outside the
    /// closed set.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intent of a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    /// User wants to book or continue booking an appointment
    Appointment,
    /// User asks to be escalated to a human
    Escalation,
    /// Anything else; answered with knowledge-base retrieval
    GeneralInquiry,
}

impl IntentLabel {
    /// Parse a raw classifier label. Accepts both the underscore and the
    /// space-separated spelling of the general-inquiry label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "appointment" => Some(IntentLabel::Appointment),
            "escalation" => Some(IntentLabel::Escalation),
            "general inquiry" | "general_inquiry" => Some(IntentLabel::GeneralInquiry),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::Appointment => "appointment",
            IntentLabel::Escalation => "escalation",
            IntentLabel::GeneralInquiry => "general_inquiry",
        }
    }
}

impl std::fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
