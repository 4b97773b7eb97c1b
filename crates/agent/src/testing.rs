//! Shared test doubles for the pipeline

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use support_agent_llm::{FinishReason, GenerationResult, LlmBackend, LlmError, Message};
use support_agent_rag::{KnowledgeLookup, RagError, RetrievalOutcome};

/// Backend that replays scripted responses in order and records every call
pub(crate) struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    pub calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Content of the last recorded request's final message
    pub fn last_user_content(&self) -> Option<String> {
        self.calls
            .lock()
            .last()
            .and_then(|messages| messages.last().map(|m| m.content.clone()))
    }

    fn next(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
        self.calls.lock().push(messages.to_vec());
        let response = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or(Ok("ok".to_string()));
        response.map(|text| GenerationResult {
            text,
            tokens: 1,
            total_time_ms: 0,
            finish_reason: FinishReason::Stop,
        })
    }
}

#[async_trait]
impl LlmBackend for ScriptedLlm {
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
        self.next(messages)
    }

    async fn generate_json(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
        self.next(messages)
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Knowledge lookup with a fixed outcome
pub(crate) struct ScriptedKnowledge {
    outcome: RetrievalOutcome,
    pub queries: Mutex<Vec<String>>,
}

impl ScriptedKnowledge {
    pub fn passage(text: &str) -> Self {
        Self {
            outcome: RetrievalOutcome::Passage(text.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn no_match() -> Self {
        Self {
            outcome: RetrievalOutcome::NoMatch,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl KnowledgeLookup for ScriptedKnowledge {
    async fn lookup(&self, query: &str) -> Result<RetrievalOutcome, RagError> {
        self.queries.lock().push(query.to_string());
        Ok(self.outcome.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
