//! Conversation orchestration
//!
//! The pipeline behind each chat turn:
//! - sentiment and intent classification via the completion backend
//! - appointment slot filling across turns
//! - knowledge-base retrieval for general inquiries
//! - final reply generation with session memory

pub mod appointment;
pub mod classifier;
pub mod extractor;
pub mod orchestrator;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use appointment::{AppointmentOutcome, AppointmentRecord, AppointmentState, ExtractedSlots};
pub use classifier::Classifier;
pub use extractor::SlotExtractor;
pub use orchestrator::SupportAgent;
pub use session::{CreateOutcome, Session, SessionStore};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("backend unavailable: {0}")]
    Backend(String),
}

impl From<support_agent_llm::LlmError> for AgentError {
    fn from(err: support_agent_llm::LlmError) -> Self {
        AgentError::Backend(err.to_string())
    }
}

impl From<support_agent_rag::RagError> for AgentError {
    fn from(err: support_agent_rag::RagError) -> Self {
        AgentError::Backend(err.to_string())
    }
}
