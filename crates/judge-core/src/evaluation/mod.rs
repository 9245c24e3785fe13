//! Evaluation domain module.
//!
//! This module contains the structured evaluation payload types, the
//! score-tier policy, the result reconciler, and the backend seam.
//!
//! # Module Structure
//!
//! - `result`: Payload types (`EvaluationResult`, `EvaluationFailure`,
//!   `Analysis`, `ScoreDimension`)
//! - `trace`: Execution-trace parsing (`TraceLine`, `TraceSeverity`)
//! - `tier`: Score-tier policy (`ScoreTier`, `TierPolicy`, `ScorePolicy`)
//! - `reconciler`: Preview-document resolution and score sanitation
//! - `backend`: The `EvaluationBackend` trait

mod backend;
pub mod reconciler;
mod result;
mod tier;
mod trace;

// Re-export public API
pub use backend::EvaluationBackend;
pub use result::{Analysis, EvaluationFailure, EvaluationResult, ScoreDimension};
pub use tier::{ScorePolicy, ScoreTier, TierPolicy};
pub use trace::{TraceLine, TraceSeverity};
