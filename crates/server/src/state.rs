//! Application state
//!
//! Shared state across all handlers.

use parking_lot::RwLock;
use std::sync::Arc;

use support_agent_agent::{SessionStore, SupportAgent};
use support_agent_config::Settings;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Settings>>,
    /// Conversation orchestrator
    pub agent: Arc<SupportAgent>,
    /// Session store (shared with the agent)
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Settings, agent: Arc<SupportAgent>) -> Self {
        let sessions = agent.store();
        Self {
            config: Arc::new(RwLock::new(config)),
            agent,
            sessions,
        }
    }

    /// Get a read guard to the current configuration
    pub fn get_config(&self) -> parking_lot::RwLockReadGuard<'_, Settings> {
        self.config.read()
    }
}
