//! Conversation domain module.
//!
//! This module contains the message store and the turn model for one
//! evaluation conversation.
//!
//! # Module Structure
//!
//! - `turn`: Turn types (`TurnRole`, `TurnContent`, `Turn`)
//! - `transcript`: The append-only message store (`Transcript`) and wire
//!   message types (`WireRole`, `WireMessage`)
//! - `view_mode`: Session state types (`ViewMode`, `Phase`)

mod transcript;
mod turn;
mod view_mode;

// Re-export public API
pub use transcript::{Transcript, WireMessage, WireRole};
pub use turn::{Turn, TurnContent, TurnRole};
pub use view_mode::{Phase, ViewMode};
