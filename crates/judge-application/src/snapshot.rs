//! Serializable projections of session state for view code.
//!
//! Views consume snapshots only; they never reach into the controller's
//! state or mutate it directly.

use judge_core::conversation::{Phase, Turn, ViewMode};
use judge_core::evaluation::{Analysis, ScoreDimension, ScoreTier};
use serde::Serialize;

/// One row of the score panel: a dimension, its numeric score, and the
/// tier the configured policy assigns to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub dimension: ScoreDimension,
    pub score: u8,
    pub tier: ScoreTier,
}

/// A point-in-time projection of one conversation session.
///
/// `preview_document` is attacker-controlled markup when the evaluated
/// HTML came from untrusted input: hosts must render it in a sandboxed,
/// non-privileged context with no access to the host page's cookies or
/// storage.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Unique session identifier (UUID format).
    pub id: String,
    /// Timestamp when the session was created (ISO 8601 format).
    pub created_at: String,
    /// Current state machine phase.
    pub phase: Phase,
    /// Active view tab.
    pub view_mode: ViewMode,
    /// The conversation turns, in submission order.
    pub turns: Vec<Turn>,
    /// The current editor document.
    pub editor_document: String,
    /// The document the preview surface should render.
    pub preview_document: String,
    /// The currently displayed analysis, if any.
    pub analysis: Option<Analysis>,
    /// Score rows for the dimensions the configured policy surfaces.
    pub scores: Vec<ScoreEntry>,
}
