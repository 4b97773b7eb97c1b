//! Session management
//!
//! Sessions are keyed by a user-chosen, case-sensitive name. The store owns
//! every session for the process lifetime; callers borrow an `Arc<Session>`
//! per request. Requests against different sessions never block one another;
//! requests against the same session serialize on its pipeline gate so turn
//! ordering and slot merges stay consistent.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use support_agent_core::{Turn, TurnRole};

use crate::appointment::AppointmentRecord;
use crate::AgentError;

/// Result of a create call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A fresh session was allocated
    Created,
    /// The name was already taken; the existing session is untouched
    AlreadyExists,
}

/// A single conversation session
pub struct Session {
    name: String,
    turns: Mutex<Vec<Turn>>,
    appointment: Mutex<AppointmentRecord>,
    /// Serializes pipeline runs against this session
    gate: tokio::sync::Mutex<()>,
}

impl Session {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            turns: Mutex::new(Vec::new()),
            appointment: Mutex::new(AppointmentRecord::new()),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the turn history in chronological order
    pub fn turns(&self) -> Vec<Turn> {
        self.turns.lock().clone()
    }

    pub fn turn_count(&self) -> usize {
        self.turns.lock().len()
    }

    /// Append a turn to the history
    pub fn push_turn(&self, role: TurnRole, text: &str) {
        self.turns.lock().push(Turn::new(role, text));
    }

    /// Run a closure against the appointment record under its lock
    pub fn with_appointment<R>(&self, f: impl FnOnce(&mut AppointmentRecord) -> R) -> R {
        f(&mut self.appointment.lock())
    }

    /// Acquire the pipeline gate for the duration of a request
    pub async fn lock_pipeline(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}

/// In-memory session store
///
/// Sessions are never evicted; memory grows with the number of distinct
/// session names for the life of the process.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session. Creating an existing name is an informational
    /// success, not an error, and leaves the existing session untouched.
    pub fn create(&self, name: &str) -> CreateOutcome {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(name) {
            return CreateOutcome::AlreadyExists;
        }
        sessions.insert(name.to_string(), Arc::new(Session::new(name)));
        tracing::info!(session = %name, "created session");
        CreateOutcome::Created
    }

    /// Look up a session by name
    pub fn get(&self, name: &str) -> Result<Arc<Session>, AgentError> {
        self.sessions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::UnknownSession(name.to_string()))
    }

    /// All session names, order unspecified
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Append a turn to a named session
    pub fn append_turn(&self, name: &str, role: TurnRole, text: &str) -> Result<(), AgentError> {
        let session = self.get(name)?;
        session.push_turn(role, text);
        Ok(())
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_list() {
        let store = SessionStore::new();
        assert_eq!(store.create("alice"), CreateOutcome::Created);
        assert!(store.list().contains(&"alice".to_string()));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_duplicate_create_leaves_history_untouched() {
        let store = SessionStore::new();
        store.create("bob");
        store
            .append_turn("bob", TurnRole::User, "hello")
            .unwrap();

        assert_eq!(store.create("bob"), CreateOutcome::AlreadyExists);

        let session = store.get("bob").unwrap();
        assert_eq!(session.turn_count(), 1);
        assert_eq!(session.turns()[0].text, "hello");
    }

    #[test]
    fn test_get_unknown_session() {
        let store = SessionStore::new();
        let err = store.get("nobody").unwrap_err();
        assert!(matches!(err, AgentError::UnknownSession(name) if name == "nobody"));
    }

    #[test]
    fn test_session_names_are_case_sensitive() {
        let store = SessionStore::new();
        assert_eq!(store.create("Carol"), CreateOutcome::Created);
        assert_eq!(store.create("carol"), CreateOutcome::Created);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_append_turn_preserves_order() {
        let store = SessionStore::new();
        store.create("dave");
        store.append_turn("dave", TurnRole::User, "first").unwrap();
        store
            .append_turn("dave", TurnRole::Assistant, "second")
            .unwrap();

        let turns = store.get("dave").unwrap().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].text, "first");
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].text, "second");
    }

    #[test]
    fn test_append_turn_unknown_session_fails() {
        let store = SessionStore::new();
        let err = store
            .append_turn("ghost", TurnRole::User, "boo")
            .unwrap_err();
        assert!(matches!(err, AgentError::UnknownSession(_)));
    }
}
