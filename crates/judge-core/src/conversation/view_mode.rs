//! View mode and phase types for session state management.

use serde::{Deserialize, Serialize};

/// Represents which tab of the evaluation view is active.
///
/// View mode is orthogonal UI state: it never blocks a transition of the
/// conversation state machine. It is mutated only through the controller,
/// never set directly by view code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Structured score analysis.
    #[default]
    Analysis,
    /// The follow-up conversation.
    Chat,
    /// The rendered preview document.
    Preview,
    /// Raw evaluation logs (execution trace).
    Logs,
}

/// The conversation state machine phase.
///
/// There are only two real states: the busy flag exists solely to
/// serialize requests, never to parallelize them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No evaluation request in flight.
    #[default]
    Idle,
    /// One evaluation request in flight; further submissions are rejected.
    Evaluating,
}

impl Phase {
    /// Returns `true` while a request is in flight.
    pub fn is_evaluating(&self) -> bool {
        matches!(self, Self::Evaluating)
    }
}
