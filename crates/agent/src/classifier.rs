//! Sentiment and intent classification
//!
//! Each classification is one completion-backend call with a fixed template
//! and deterministic post-processing: trim, lowercase, validate against the
//! closed label set. A label outside the set never crashes the pipeline;
//! sentiment falls back to neutral and intent to general inquiry so the
//! branch logic downstream always has a defined path. Nothing is cached -
//! every message is classified fresh, even within a session.

use std::sync::Arc;

use support_agent_config::PromptCatalog;
use support_agent_core::{IntentLabel, Sentiment};
use support_agent_llm::{LlmBackend, Message};

use crate::AgentError;

/// Message classifier
pub struct Classifier {
    llm: Arc<dyn LlmBackend>,
    prompts: Arc<PromptCatalog>,
}

impl Classifier {
    pub fn new(llm: Arc<dyn LlmBackend>, prompts: Arc<PromptCatalog>) -> Self {
        Self { llm, prompts }
    }

    /// Classify the sentiment of a message
    pub async fn classify_sentiment(&self, text: &str) -> Result<Sentiment, AgentError> {
        let prompt = self.prompts.sentiment_prompt(text);
        let result = self.llm.generate(&[Message::user(prompt)]).await?;

        let label = result.text.trim().to_lowercase();
        Ok(Sentiment::parse(&label).unwrap_or_else(|| {
            tracing::warn!(label = %label, "unrecognized sentiment label, defaulting to neutral");
            Sentiment::Neutral
        }))
    }

    /// Classify the intent of a message
    pub async fn classify_intent(&self, text: &str) -> Result<IntentLabel, AgentError> {
        let prompt = self.prompts.intent_prompt(text);
        let result = self.llm.generate(&[Message::user(prompt)]).await?;

        let label = result.text.trim().to_lowercase();
        Ok(IntentLabel::parse(&label).unwrap_or_else(|| {
            tracing::warn!(label = %label, "unrecognized intent label, defaulting to general inquiry");
            IntentLabel::GeneralInquiry
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedLlm;
    use support_agent_llm::LlmError;

    fn classifier(responses: Vec<Result<String, LlmError>>) -> Classifier {
        Classifier::new(
            Arc::new(ScriptedLlm::new(responses)),
            Arc::new(PromptCatalog::default()),
        )
    }

    #[tokio::test]
    async fn test_sentiment_labels_are_normalized() {
        let classifier = classifier(vec![Ok(" Negative \n".to_string())]);
        let sentiment = classifier.classify_sentiment("this is awful").await.unwrap();
        assert_eq!(sentiment, Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_unrecognized_sentiment_falls_back_to_neutral() {
        let classifier = classifier(vec![Ok("ambivalent".to_string())]);
        let sentiment = classifier.classify_sentiment("hmm").await.unwrap();
        assert_eq!(sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_intent_accepts_space_separated_label() {
        let classifier = classifier(vec![Ok("general inquiry".to_string())]);
        let intent = classifier.classify_intent("when do you open?").await.unwrap();
        assert_eq!(intent, IntentLabel::GeneralInquiry);
    }

    #[tokio::test]
    async fn test_unrecognized_intent_falls_back_to_general_inquiry() {
        let classifier = classifier(vec![Ok("chitchat".to_string())]);
        let intent = classifier.classify_intent("hello there").await.unwrap();
        assert_eq!(intent, IntentLabel::GeneralInquiry);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let classifier = classifier(vec![Err(LlmError::Timeout)]);
        let err = classifier.classify_sentiment("hi").await.unwrap_err();
        assert!(matches!(err, AgentError::Backend(_)));
    }

    #[tokio::test]
    async fn test_prompt_contains_message() {
        let llm = Arc::new(ScriptedLlm::new(vec![Ok("neutral".to_string())]));
        let classifier = Classifier::new(llm.clone(), Arc::new(PromptCatalog::default()));
        classifier.classify_sentiment("where is my book").await.unwrap();

        let calls = llm.calls.lock();
        assert_eq!(calls.len(), 1);
        assert!(calls[0][0].content.contains("where is my book"));
    }
}
