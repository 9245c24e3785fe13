//! The seam between the conversation controller and the evaluation wire.

use super::result::{EvaluationFailure, EvaluationResult};
use crate::conversation::WireMessage;
use async_trait::async_trait;

/// An abstract evaluation endpoint.
///
/// This trait defines the contract for dispatching one wire-format
/// transcript and obtaining either a structured result or the failure
/// that took its place. It lives in the core crate so the application
/// layer can depend on it without a circular dependency on the HTTP
/// implementation.
///
/// # Implementation Notes
///
/// Implementations must:
/// - issue exactly one request per call, with no automatic retry
///   (transient failures are surfaced, not masked);
/// - never panic or return a transport error type: every failure mode
///   degrades to an [`EvaluationFailure`] with the best available
///   message;
/// - leave numeric bound validation to the caller (the reconciler owns
///   score sanitation).
#[async_trait]
pub trait EvaluationBackend: Send + Sync {
    /// Sends the wire-format transcript and awaits the evaluator's reply.
    ///
    /// The transcript is non-empty by contract: the controller appends
    /// the user turn before dispatching.
    async fn send(
        &self,
        messages: &[WireMessage],
    ) -> std::result::Result<EvaluationResult, EvaluationFailure>;
}
