//! Appointment slot extraction
//!
//! One completion call in JSON mode, constrained to return exactly the three
//! appointment fields. A malformed payload is an `Extraction` error; the
//! caller treats that as "no new information" and carries on with empty
//! fields rather than aborting the turn.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use support_agent_config::PromptCatalog;
use support_agent_llm::{LlmBackend, Message};

use crate::appointment::ExtractedSlots;
use crate::AgentError;

// Some backends wrap JSON output in prose or code fences; take the outermost
// object.
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[\s\S]*\}").unwrap());

/// Slot extractor
pub struct SlotExtractor {
    llm: Arc<dyn LlmBackend>,
    prompts: Arc<PromptCatalog>,
}

impl SlotExtractor {
    pub fn new(llm: Arc<dyn LlmBackend>, prompts: Arc<PromptCatalog>) -> Self {
        Self { llm, prompts }
    }

    /// Extract appointment fields from a message
    pub async fn extract(&self, text: &str) -> Result<ExtractedSlots, AgentError> {
        let messages = [
            Message::system(self.prompts.extraction_instruction.clone()),
            Message::user(text),
        ];

        let result = self.llm.generate_json(&messages).await?;
        parse_slots(&result.text)
    }
}

fn parse_slots(raw: &str) -> Result<ExtractedSlots, AgentError> {
    let payload = JSON_OBJECT
        .find(raw)
        .map(|m| m.as_str())
        .unwrap_or_else(|| raw.trim());

    serde_json::from_str::<ExtractedSlots>(payload)
        .map_err(|e| AgentError::Extraction(format!("invalid slot payload: {}", e)))
}
