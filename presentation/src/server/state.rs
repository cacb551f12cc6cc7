//! Shared server state: the orchestrator and per-session conversations

use andy_application::{ToolSchemaPort, WorkflowOrchestrator};
use andy_domain::ConversationState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Session used when a request names none
pub const DEFAULT_SESSION: &str = "default";

/// Sessions kept before idle ones are dropped to make room
pub const MAX_SESSIONS: usize = 1024;

type Session = Arc<tokio::sync::Mutex<ConversationState>>;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    orchestrator: WorkflowOrchestrator,
    schema: Arc<dyn ToolSchemaPort>,
    sessions: Mutex<HashMap<String, Session>>,
}

impl AppState {
    pub fn new(orchestrator: WorkflowOrchestrator, schema: Arc<dyn ToolSchemaPort>) -> Self {
        Self {
            inner: Arc::new(Inner {
                orchestrator,
                schema,
                sessions: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn orchestrator(&self) -> &WorkflowOrchestrator {
        &self.inner.orchestrator
    }

    pub fn schema(&self) -> &dyn ToolSchemaPort {
        self.inner.schema.as_ref()
    }

    /// Session for `id`, created on first use.
    ///
    /// Each session has its own async mutex, so one session handles one
    /// message at a time while others proceed.
    pub fn session(&self, id: &str) -> Session {
        let mut sessions = self
            .inner
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !sessions.contains_key(id) && sessions.len() >= MAX_SESSIONS {
            prune_idle(&mut sessions);
        }
        sessions
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(ConversationState::new())))
            .clone()
    }

    /// Forget a session; the next request with `id` starts fresh.
    pub fn remove_session(&self, id: &str) -> Option<Session> {
        self.inner
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(id)
    }

    /// Existing session, if any
    pub fn existing_session(&self, id: &str) -> Option<Session> {
        self.inner
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    pub fn session_count(&self) -> usize {
        self.inner
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Drop sessions no request holds, starting with those not mid-analysis.
fn prune_idle(sessions: &mut HashMap<String, Session>) {
    let unused = |session: &Session| Arc::strong_count(session) == 1;
    sessions.retain(|_, session| {
        !unused(session)
            || session
                .try_lock()
                .map(|conversation| conversation.is_active())
                .unwrap_or(true)
    });
    if sessions.len() >= MAX_SESSIONS {
        sessions.retain(|_, session| !unused(session));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::orchestrator;
    use andy_application::ToolSchemaPort;
    use andy_domain::ToolDefinition;
    use serde_json::{Value, json};

    struct NameOnlySchema;

    impl ToolSchemaPort for NameOnlySchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
            json!({ "name": tool.name })
        }
    }

    fn app_state() -> AppState {
        AppState::new(orchestrator(), Arc::new(NameOnlySchema))
    }

    #[test]
    fn test_remove_session() {
        let state = app_state();
        state.session("a");
        state.session("b");
        assert!(state.remove_session("a").is_some());
        assert!(state.remove_session("a").is_none());
        assert!(state.existing_session("a").is_none());
        assert_eq!(state.session_count(), 1);
    }

    #[tokio::test]
    async fn test_session_map_is_bounded() {
        let state = app_state();
        let held = state.session("held");
        let active = state.session("active");
        active.lock().await.begin_analysis("https://acme.io/p/1");
        drop(active);

        for i in 0..MAX_SESSIONS * 2 {
            state.session(&format!("client-{i}"));
            assert!(state.session_count() <= MAX_SESSIONS);
        }

        assert!(Arc::ptr_eq(&held, &state.session("held")));
        assert!(state.existing_session("active").is_some());
        assert!(state.existing_session("client-0").is_none());
    }
}
