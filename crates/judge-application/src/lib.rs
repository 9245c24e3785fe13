//! Application layer for the HTML Judge engine.
//!
//! This crate orchestrates the core domain: the
//! [`controller::ConversationController`] state machine that drives one
//! evaluation conversation, the snapshot projections view code consumes,
//! and the [`registry::SessionRegistry`] that keeps independent sessions
//! apart.

pub mod controller;
pub mod registry;
pub mod snapshot;

pub use controller::{ConversationController, SubmitOutcome};
pub use registry::SessionRegistry;
pub use snapshot::{ScoreEntry, SessionSnapshot};
