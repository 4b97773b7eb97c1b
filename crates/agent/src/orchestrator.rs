//! Chat pipeline orchestration
//!
//! Each request runs one sequential pipeline: classify sentiment, classify
//! intent, branch into slot filling / escalation / retrieval, then hand the
//! augmented message plus the session's history to the completion backend.
//! Annotations accumulate - a negative-sentiment notice does not stop intent
//! handling, and an escalation annotation still reaches the model. The only
//! short-circuit is an incomplete appointment: its follow-up prompt goes back
//! to the user without a completion call, since the model has nothing to add.

use std::sync::Arc;

use support_agent_config::PromptCatalog;
use support_agent_core::{IntentLabel, Sentiment, TurnRole};
use support_agent_llm::{LlmBackend, PromptBuilder};
use support_agent_rag::{KnowledgeLookup, RetrievalOutcome};

use crate::appointment::{AppointmentOutcome, ExtractedSlots};
use crate::classifier::Classifier;
use crate::extractor::SlotExtractor;
use crate::session::{Session, SessionStore};
use crate::AgentError;

/// The conversation orchestrator
pub struct SupportAgent {
    llm: Arc<dyn LlmBackend>,
    retriever: Arc<dyn KnowledgeLookup>,
    classifier: Classifier,
    extractor: SlotExtractor,
    store: Arc<SessionStore>,
    prompts: Arc<PromptCatalog>,
}

impl SupportAgent {
    pub fn new(
        llm: Arc<dyn LlmBackend>,
        retriever: Arc<dyn KnowledgeLookup>,
        store: Arc<SessionStore>,
        prompts: Arc<PromptCatalog>,
    ) -> Self {
        Self {
            classifier: Classifier::new(llm.clone(), prompts.clone()),
            extractor: SlotExtractor::new(llm.clone(), prompts.clone()),
            llm,
            retriever,
            store,
            prompts,
        }
    }

    /// Session store handle
    pub fn store(&self) -> Arc<SessionStore> {
        self.store.clone()
    }

    /// Handle one chat message for a named session
    ///
    /// The session must already exist; nothing is created implicitly. On a
    /// backend outage the caller gets a canned reply and the turn history is
    /// left untouched, so a client retry cannot duplicate turns.
    pub async fn chat(&self, session_name: &str, message: &str) -> Result<String, AgentError> {
        let session = self.store.get(session_name)?;
        let _gate = session.lock_pipeline().await;

        let started = std::time::Instant::now();
        match self.run_pipeline(&session, message).await {
            Ok(reply) => {
                session.push_turn(TurnRole::User, message);
                session.push_turn(TurnRole::Assistant, &reply);
                tracing::info!(
                    session = %session_name,
                    latency_ms = started.elapsed().as_millis() as u64,
                    turns = session.turn_count(),
                    "chat turn completed"
                );
                Ok(reply)
            }
            Err(err) => {
                tracing::error!(
                    session = %session_name,
                    error = %err,
                    "pipeline failed, returning fallback reply"
                );
                let reply = match err {
                    AgentError::Backend(_) => self.prompts.unavailable_reply.clone(),
                    _ => self.prompts.error_reply.clone(),
                };
                Ok(reply)
            }
        }
    }

    async fn run_pipeline(&self, session: &Session, message: &str) -> Result<String, AgentError> {
        let mut augmented = format!("Here is the user message: {}\n", message);

        let sentiment = self.classifier.classify_sentiment(message).await?;
        if sentiment == Sentiment::Negative {
            tracing::info!(session = %session.name(), "negative sentiment, adding escalation notice");
            augmented.push_str(&self.prompts.escalation_notice);
            augmented.push('\n');
        }

        let intent = self.classifier.classify_intent(message).await?;
        tracing::debug!(
            session = %session.name(),
            sentiment = %sentiment,
            intent = %intent,
            "message classified"
        );

        match intent {
            IntentLabel::Appointment => {
                let slots = match self.extractor.extract(message).await {
                    Ok(slots) => slots,
                    Err(AgentError::Extraction(reason)) => {
                        tracing::warn!(
                            session = %session.name(),
                            reason = %reason,
                            "slot extraction failed, continuing with empty fields"
                        );
                        ExtractedSlots::default()
                    }
                    Err(other) => return Err(other),
                };

                let outcome = session.with_appointment(|record| record.apply(&slots));
                match outcome {
                    AppointmentOutcome::Collecting { prompt } => {
                        // Incomplete appointments never reach the model
                        return Ok(prompt);
                    }
                    AppointmentOutcome::Confirmed { confirmation } => {
                        tracing::info!(session = %session.name(), "appointment confirmed");
                        augmented.push_str(&confirmation);
                        augmented.push('\n');
                    }
                }
            }
            IntentLabel::Escalation => {
                tracing::info!(session = %session.name(), "escalation requested");
                augmented.push_str(&self.prompts.escalation_annotation);
                augmented.push('\n');
            }
            IntentLabel::GeneralInquiry => {
                let passage = match self.retriever.lookup(message).await? {
                    RetrievalOutcome::Passage(text) => text,
                    RetrievalOutcome::NoMatch => self.prompts.no_match_marker.clone(),
                };
                augmented.push_str(&format!(
                    "\nHere is a relevant knowledge-base passage: {}\n",
                    passage
                ));
            }
        }

        let mut builder = PromptBuilder::new().system(self.prompts.system_prompt.clone());
        for turn in session.turns() {
            builder = match turn.role {
                TurnRole::User => builder.user(turn.text),
                TurnRole::Assistant => builder.assistant(turn.text),
            };
        }
        let messages = builder.user(augmented).build();

        let result = self.llm.generate(&messages).await?;
        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedKnowledge, ScriptedLlm};
    use support_agent_llm::LlmError;

    fn agent_with(
        llm: Arc<ScriptedLlm>,
        retriever: Arc<ScriptedKnowledge>,
    ) -> (SupportAgent, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::new());
        let agent = SupportAgent::new(
            llm,
            retriever,
            store.clone(),
            Arc::new(PromptCatalog::default()),
        );
        (agent, store)
    }

    #[tokio::test]
    async fn test_unknown_session_is_client_error_with_no_mutation() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let (agent, store) = agent_with(llm.clone(), Arc::new(ScriptedKnowledge::no_match()));

        let err = agent.chat("ghost", "hello").await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownSession(_)));
        assert_eq!(store.count(), 0);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_general_inquiry_appends_passage_and_records_turns() {
        // calls: sentiment, intent, completion
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("neutral".to_string()),
            Ok("general inquiry".to_string()),
            Ok("We open at 9am.".to_string()),
        ]));
        let retriever = Arc::new(ScriptedKnowledge::passage("Hours: 9am-8pm weekdays."));
        let (agent, store) = agent_with(llm.clone(), retriever.clone());
        store.create("alice");

        let reply = agent.chat("alice", "when do you open?").await.unwrap();
        assert_eq!(reply, "We open at 9am.");

        // The completion request carries the retrieved passage
        let last = llm.last_user_content().unwrap();
        assert!(last.contains("Hours: 9am-8pm weekdays."));
        assert!(last.contains("when do you open?"));
        assert_eq!(retriever.queries.lock().as_slice(), ["when do you open?"]);

        // Turn ordering after one exchange: [user, assistant]
        let turns = store.get("alice").unwrap().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].text, "when do you open?");
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].text, "We open at 9am.");
    }

    #[tokio::test]
    async fn test_no_match_uses_marker_never_empty() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("neutral".to_string()),
            Ok("general inquiry".to_string()),
            Ok("Let me check with staff.".to_string()),
        ]));
        let (agent, store) = agent_with(llm.clone(), Arc::new(ScriptedKnowledge::no_match()));
        store.create("alice");

        agent.chat("alice", "do you rent telescopes?").await.unwrap();

        let last = llm.last_user_content().unwrap();
        assert!(last.contains("Sorry, I couldn't find a relevant answer."));
    }

    #[tokio::test]
    async fn test_negative_sentiment_still_produces_full_reply() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("negative".to_string()),
            Ok("general inquiry".to_string()),
            Ok("I'm sorry to hear that; here's what we can do.".to_string()),
        ]));
        let (agent, store) = agent_with(llm.clone(), Arc::new(ScriptedKnowledge::no_match()));
        store.create("bob");

        let reply = agent.chat("bob", "this service is terrible").await.unwrap();

        // Full pipeline reply, not a canned string
        assert_eq!(reply, "I'm sorry to hear that; here's what we can do.");
        // The escalation notice made it into the augmented message
        let last = llm.last_user_content().unwrap();
        assert!(last.contains("I'll escalate this to a support specialist"));
        // Intent classification still ran after the negative sentiment
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_escalation_intent_annotates_and_continues() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("neutral".to_string()),
            Ok("escalation".to_string()),
            Ok("A specialist will reach out shortly.".to_string()),
        ]));
        let (agent, store) = agent_with(llm.clone(), Arc::new(ScriptedKnowledge::no_match()));
        store.create("carol");

        let reply = agent
            .chat("carol", "let me talk to a human")
            .await
            .unwrap();
        assert_eq!(reply, "A specialist will reach out shortly.");

        let last = llm.last_user_content().unwrap();
        assert!(last.contains("further assistance"));
    }

    #[tokio::test]
    async fn test_incomplete_appointment_short_circuits() {
        // calls: sentiment, intent, extraction - no completion
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("positive".to_string()),
            Ok("appointment".to_string()),
            Ok(r#"{"date": "Friday", "time": "", "purpose": ""}"#.to_string()),
        ]));
        let (agent, store) = agent_with(llm.clone(), Arc::new(ScriptedKnowledge::no_match()));
        store.create("dana");

        let reply = agent
            .chat("dana", "book me something on Friday")
            .await
            .unwrap();

        assert!(reply.contains("Can you provide the time and purpose?"));
        // Exactly three backend calls: the completion was skipped
        assert_eq!(llm.call_count(), 3);

        // The prompt is still a real exchange in the history
        let turns = store.get("dana").unwrap().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].text, reply);
    }

    #[tokio::test]
    async fn test_completed_appointment_reaches_completion() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            // turn 1: date only
            Ok("neutral".to_string()),
            Ok("appointment".to_string()),
            Ok(r#"{"date": "Monday", "time": "", "purpose": ""}"#.to_string()),
            // turn 2: time and purpose complete the record
            Ok("neutral".to_string()),
            Ok("appointment".to_string()),
            Ok(r#"{"date": "", "time": "4pm", "purpose": "consultation"}"#.to_string()),
            Ok("See you Monday at 4pm!".to_string()),
        ]));
        let (agent, store) = agent_with(llm.clone(), Arc::new(ScriptedKnowledge::no_match()));
        store.create("erin");

        let first = agent.chat("erin", "appointment on Monday").await.unwrap();
        assert!(first.contains("time and purpose"));

        let second = agent
            .chat("erin", "4pm, for a consultation")
            .await
            .unwrap();
        assert_eq!(second, "See you Monday at 4pm!");

        // The confirmation text went into the completion request
        let last = llm.last_user_content().unwrap();
        assert!(last.contains("Your appointment has been confirmed for Monday at 4pm for consultation."));
    }

    #[tokio::test]
    async fn test_extraction_failure_degrades_to_empty_fields() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("neutral".to_string()),
            Ok("appointment".to_string()),
            Ok("no json here at all".to_string()),
        ]));
        let (agent, store) = agent_with(llm.clone(), Arc::new(ScriptedKnowledge::no_match()));
        store.create("frank");

        // Degrades to all-empty extraction: every field is still missing
        let reply = agent.chat("frank", "I want an appointment").await.unwrap();
        assert!(reply.contains("date and time and purpose"));
    }

    #[tokio::test]
    async fn test_backend_outage_returns_canned_reply_without_turns() {
        let llm = Arc::new(ScriptedLlm::new(vec![Err(LlmError::RateLimited(
            "overloaded".to_string(),
        ))]));
        let (agent, store) = agent_with(llm.clone(), Arc::new(ScriptedKnowledge::no_match()));
        store.create("gina");

        let reply = agent.chat("gina", "hello?").await.unwrap();
        assert_eq!(
            reply,
            PromptCatalog::default().unavailable_reply
        );
        // No retry happened and nothing was recorded
        assert_eq!(llm.call_count(), 1);
        assert_eq!(store.get("gina").unwrap().turn_count(), 0);
    }

    #[tokio::test]
    async fn test_history_is_sent_to_completion() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Ok("neutral".to_string()),
            Ok("general inquiry".to_string()),
            Ok("first reply".to_string()),
            Ok("neutral".to_string()),
            Ok("general inquiry".to_string()),
            Ok("second reply".to_string()),
        ]));
        let (agent, store) = agent_with(llm.clone(), Arc::new(ScriptedKnowledge::no_match()));
        store.create("hana");

        agent.chat("hana", "first question").await.unwrap();
        agent.chat("hana", "second question").await.unwrap();

        let calls = llm.calls.lock();
        let completion = calls.last().unwrap();
        // system + 2 history turns + augmented message
        assert_eq!(completion.len(), 4);
        assert!(completion[1].content.contains("first question"));
        assert_eq!(completion[2].content, "first reply");
    }
}
