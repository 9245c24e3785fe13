//! Conversation turn types.
//!
//! This module contains types for representing turns in an evaluation
//! conversation, including roles and turn content.

use crate::error::Result;
use crate::evaluation::{EvaluationFailure, EvaluationResult};
use serde::{Deserialize, Serialize};

/// Represents the role of a turn in an evaluation conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Turn submitted by the user.
    User,
    /// Turn produced by the evaluator.
    Assistant,
    /// Engine-generated notice shown in the conversation but never sent
    /// to the evaluator.
    SystemNotice,
}

/// The content carried by a single turn.
///
/// User turns and system notices are plain text (a user turn may embed
/// source markup verbatim). Assistant turns carry either a structured
/// evaluation or the failure that took its place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TurnContent {
    /// Plain text content.
    Text(String),
    /// A successful structured evaluation.
    Evaluation(EvaluationResult),
    /// A failed evaluation attempt.
    Failure(EvaluationFailure),
}

impl TurnContent {
    /// Coerces the content to the text form the evaluator sees.
    ///
    /// Plain text passes through unchanged. Structured content is
    /// serialized to canonical JSON, so the text-oriented evaluator sees
    /// its own prior structured answer as text in the transcript.
    pub fn wire_text(&self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Evaluation(result) => Ok(serde_json::to_string(result)?),
            Self::Failure(failure) => Ok(serde_json::to_string(failure)?),
        }
    }
}

/// A single turn in an evaluation conversation.
///
/// Turns are immutable once appended to a [`super::Transcript`]; the
/// timestamp records submission time (ISO 8601 format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// The role of the turn author.
    pub role: TurnRole,
    /// The content of the turn.
    pub content: TurnContent,
    /// Timestamp when the turn was created (ISO 8601 format).
    pub timestamp: String,
}

impl Turn {
    fn new(role: TurnRole, content: TurnContent) -> Self {
        Self {
            role,
            content,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a user turn carrying plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, TurnContent::Text(text.into()))
    }

    /// Creates an assistant turn carrying a successful evaluation.
    pub fn evaluation(result: EvaluationResult) -> Self {
        Self::new(TurnRole::Assistant, TurnContent::Evaluation(result))
    }

    /// Creates an assistant turn carrying an evaluation failure.
    pub fn failure(failure: EvaluationFailure) -> Self {
        Self::new(TurnRole::Assistant, TurnContent::Failure(failure))
    }

    /// Creates a system notice turn.
    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(TurnRole::SystemNotice, TurnContent::Text(text.into()))
    }
}
