//! The append-only message store for one evaluation conversation.

use super::turn::{Turn, TurnRole};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// The role tag of a message on the wire.
///
/// Only user and assistant turns reach the evaluator; system notices are
/// filtered out during wire formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Assistant,
}

/// One element of the `messages` array sent to the evaluation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

/// The ordered, append-only log of conversation turns.
///
/// `Transcript` is the single source of truth for what has been said in a
/// session. Turns can be appended and the whole log can be reset, but no
/// turn is ever edited, reordered, or removed individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn to the end of the log.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Clears all turns.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// Returns the turns in submission order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns in the log.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` when the log holds no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Produces the ordered message sequence sent to the evaluator.
    ///
    /// System notices are filtered out. Every remaining content is coerced
    /// to text via [`super::TurnContent::wire_text`].
    ///
    /// # Errors
    ///
    /// Returns a serialization error if structured assistant content cannot
    /// be encoded, which indicates a programming error rather than a bad
    /// evaluator reply.
    pub fn to_wire_format(&self) -> Result<Vec<WireMessage>> {
        let mut messages = Vec::with_capacity(self.turns.len());
        for turn in &self.turns {
            let role = match turn.role {
                TurnRole::User => WireRole::User,
                TurnRole::Assistant => WireRole::Assistant,
                TurnRole::SystemNotice => continue,
            };
            messages.push(WireMessage {
                role,
                content: turn.content.wire_text()?,
            });
        }
        Ok(messages)
    }
}
