//! In-memory management of multiple evaluation sessions.
//!
//! Sessions are explicit, constructible objects so independent sessions
//! (or tests running in parallel) never interfere; nothing here persists
//! across process restarts.

use crate::controller::ConversationController;
use judge_core::error::{JudgeError, Result};
use judge_core::evaluation::{EvaluationBackend, ScorePolicy};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Manages the lifecycle of the process's evaluation sessions.
///
/// The registry hands out `Arc<ConversationController>` handles and
/// tracks which session is active. Dropping a session discards its
/// transcript and analysis; there is no durability requirement.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<ConversationController>>>,
    active: RwLock<Option<String>>,
    backend: Arc<dyn EvaluationBackend>,
    policy: ScorePolicy,
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions share one backend and
    /// scoring policy.
    pub fn new(backend: Arc<dyn EvaluationBackend>, policy: ScorePolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            active: RwLock::new(None),
            backend,
            policy,
        }
    }

    /// Creates a new session and sets it as active.
    pub async fn create_session(&self) -> Arc<ConversationController> {
        let controller = Arc::new(ConversationController::new(
            self.backend.clone(),
            self.policy.clone(),
        ));
        let id = controller.id().to_string();

        self.sessions
            .write()
            .await
            .insert(id.clone(), controller.clone());
        *self.active.write().await = Some(id.clone());

        tracing::info!(session = %id, "created evaluation session");
        controller
    }

    /// Returns the currently active session, if any.
    pub async fn active_session(&self) -> Option<Arc<ConversationController>> {
        let active = self.active.read().await;
        match active.as_ref() {
            Some(id) => self.sessions.read().await.get(id).cloned(),
            None => None,
        }
    }

    /// Switches to an existing session.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error when no session has the given ID.
    pub async fn switch_session(&self, session_id: &str) -> Result<Arc<ConversationController>> {
        let sessions = self.sessions.read().await;
        let controller = sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| JudgeError::not_found("session", session_id))?;
        drop(sessions);

        *self.active.write().await = Some(session_id.to_string());
        Ok(controller)
    }

    /// Removes a session, clearing the active marker if it pointed at it.
    pub async fn remove_session(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);

        let mut active = self.active.write().await;
        if active.as_deref() == Some(session_id) {
            *active = None;
        }
    }

    /// Lists the (id, created_at) pairs of every live session.
    pub async fn list_sessions(&self) -> Vec<(String, String)> {
        self.sessions
            .read()
            .await
            .values()
            .map(|c| (c.id().to_string(), c.created_at().to_string()))
            .collect()
    }
}
