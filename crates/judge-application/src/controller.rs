//! The conversation controller state machine.
//!
//! `ConversationController` owns one evaluation session: the transcript,
//! the editor document, the latest analysis, the busy flag, and the
//! active view mode. All mutation goes through its transitions; view code
//! only ever reads snapshots.

use crate::snapshot::{ScoreEntry, SessionSnapshot};
use judge_core::conversation::{Phase, Transcript, Turn, ViewMode};
use judge_core::error::Result;
use judge_core::evaluation::{
    Analysis, EvaluationBackend, EvaluationFailure, EvaluationResult, ScorePolicy, TraceLine,
    reconciler,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The outcome of a submission attempt.
///
/// Guard rejections are ordinary outcomes, not errors: a rejected
/// submission is a no-op on the transcript and dispatches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The turn ran to completion; the assistant reply (result or
    /// failure) was recorded and the session is Idle again.
    Completed,
    /// Rejected: another evaluation is already in flight.
    Busy,
    /// Rejected: the submitted document or message was empty.
    EmptyInput,
}

/// Mutable state of one session, guarded by the controller's lock.
struct SessionState {
    transcript: Transcript,
    editor_document: String,
    analysis: Option<Analysis>,
    phase: Phase,
    view_mode: ViewMode,
}

/// The orchestrating state machine for one evaluation conversation.
///
/// The state lives behind a `tokio::sync::RwLock` so all methods take
/// `&self`; the network call itself runs outside the lock, keeping
/// accessors responsive while a request is in flight. The phase flag is
/// flipped under the lock before dispatch, which is what serializes
/// submissions: a concurrent submit observes `Evaluating` and is
/// rejected outright, never queued.
pub struct ConversationController {
    id: String,
    created_at: String,
    state: RwLock<SessionState>,
    backend: Arc<dyn EvaluationBackend>,
    policy: ScorePolicy,
}

impl std::fmt::Debug for ConversationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationController")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl ConversationController {
    /// Creates an idle session bound to an evaluation backend and a
    /// scoring policy.
    pub fn new(backend: Arc<dyn EvaluationBackend>, policy: ScorePolicy) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            state: RwLock::new(SessionState {
                transcript: Transcript::new(),
                editor_document: String::new(),
                analysis: None,
                phase: Phase::Idle,
                view_mode: ViewMode::Analysis,
            }),
            backend,
            policy,
        }
    }

    /// Returns the session's unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the session's creation timestamp (ISO 8601 format).
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Starts a fresh evaluation of the editor document.
    ///
    /// Guarded by "document is non-empty AND the session is Idle". On
    /// acceptance the transcript and analysis are reset, one user turn
    /// carrying the document is appended, the view mode is forced to
    /// Analysis, and the transcript is dispatched. The method returns
    /// once the assistant reply (result or failure) has been recorded
    /// and the session is Idle again.
    ///
    /// There is no cancel operation: if the transport never resolves the
    /// session stays Evaluating (known limitation; the transport timeout
    /// is the practical bound).
    pub async fn submit_evaluation(&self, document: &str) -> Result<SubmitOutcome> {
        if document.trim().is_empty() {
            return Ok(SubmitOutcome::EmptyInput);
        }

        let wire = {
            let mut state = self.state.write().await;
            if state.phase.is_evaluating() {
                return Ok(SubmitOutcome::Busy);
            }
            state.transcript.reset();
            state.analysis = None;
            state.editor_document = document.to_string();
            state.transcript.append(Turn::user(document));
            state.view_mode = ViewMode::Analysis;
            let wire = state.transcript.to_wire_format()?;
            state.phase = Phase::Evaluating;
            wire
        };

        tracing::info!(session = %self.id, "dispatching fresh evaluation");
        let reply = self.backend.send(&wire).await;
        self.record_reply(reply, true).await;
        Ok(SubmitOutcome::Completed)
    }

    /// Sends a follow-up chat message on the existing conversation.
    ///
    /// Guarded like [`Self::submit_evaluation`] but keeps the prior
    /// turns, enabling iterative refinement. A failed follow-up leaves
    /// the last good analysis visible.
    pub async fn submit_chat(&self, text: &str) -> Result<SubmitOutcome> {
        if text.trim().is_empty() {
            return Ok(SubmitOutcome::EmptyInput);
        }

        let wire = {
            let mut state = self.state.write().await;
            if state.phase.is_evaluating() {
                return Ok(SubmitOutcome::Busy);
            }
            state.transcript.append(Turn::user(text));
            let wire = state.transcript.to_wire_format()?;
            state.phase = Phase::Evaluating;
            wire
        };

        tracing::info!(session = %self.id, turns = wire.len(), "dispatching follow-up chat");
        let reply = self.backend.send(&wire).await;
        self.record_reply(reply, false).await;
        Ok(SubmitOutcome::Completed)
    }

    /// Records the assistant reply and returns the session to Idle.
    ///
    /// A failed turn is still recorded in the transcript, preserving the
    /// conversational audit trail; it only replaces the displayed
    /// analysis when the failing call was a fresh evaluation.
    async fn record_reply(
        &self,
        reply: std::result::Result<EvaluationResult, EvaluationFailure>,
        fresh: bool,
    ) {
        let mut state = self.state.write().await;
        match reply {
            Ok(mut result) => {
                reconciler::sanitize_scores(&mut result);
                tracing::info!(session = %self.id, judgement = %result.final_judgement, "evaluation turn completed");
                state.transcript.append(Turn::evaluation(result.clone()));
                state.analysis = Some(Analysis::Evaluation(result));
            }
            Err(failure) => {
                tracing::warn!(session = %self.id, message = %failure.message, "evaluation turn failed");
                state.transcript.append(Turn::failure(failure.clone()));
                if fresh {
                    state.analysis = Some(Analysis::Failure(failure));
                }
            }
        }
        state.phase = Phase::Idle;
    }

    /// Replaces the editor document with an accepted fix.
    ///
    /// Available in any state; the conversation phase is untouched. A
    /// system notice records the application in the conversation view
    /// (notices never reach the evaluator).
    pub async fn apply_fix(&self, text: &str) {
        let mut state = self.state.write().await;
        state.editor_document = text.to_string();
        state
            .transcript
            .append(Turn::notice("Applied evaluator fix to the editor document"));
        tracing::info!(session = %self.id, "fix applied to editor document");
    }

    /// Switches the active view tab.
    pub async fn set_view_mode(&self, mode: ViewMode) {
        self.state.write().await.view_mode = mode;
    }

    /// Returns the active view tab.
    pub async fn view_mode(&self) -> ViewMode {
        self.state.read().await.view_mode
    }

    /// Returns `true` while an evaluation request is in flight.
    pub async fn is_busy(&self) -> bool {
        self.state.read().await.phase.is_evaluating()
    }

    /// Returns the current editor document.
    pub async fn editor_document(&self) -> String {
        self.state.read().await.editor_document.clone()
    }

    /// Returns the currently displayed analysis, if any.
    pub async fn current_analysis(&self) -> Option<Analysis> {
        self.state.read().await.analysis.clone()
    }

    /// Returns the number of turns in the transcript.
    pub async fn transcript_len(&self) -> usize {
        self.state.read().await.transcript.len()
    }

    /// Resolves the document the preview surface should render.
    ///
    /// Recomputed from the full history on every call (most recent fix
    /// wins); see [`reconciler::resolve_preview`] for the policy and the
    /// sandboxing contract on the returned markup.
    pub async fn preview_document(&self) -> String {
        let state = self.state.read().await;
        reconciler::resolve_preview(state.transcript.turns(), &state.editor_document)
    }

    /// Returns score rows for the dimensions the configured policy
    /// surfaces, tiered through the policy's breakpoints.
    ///
    /// Empty when there is no analysis or the analysis is a failure.
    pub async fn score_summary(&self) -> Vec<ScoreEntry> {
        let state = self.state.read().await;
        let Some(Analysis::Evaluation(result)) = &state.analysis else {
            return Vec::new();
        };
        self.policy
            .dimensions
            .iter()
            .filter_map(|&dimension| {
                result.score(dimension).map(|score| ScoreEntry {
                    dimension,
                    score,
                    tier: self.policy.tiers.classify(score),
                })
            })
            .collect()
    }

    /// Returns the parsed execution trace of the current analysis for
    /// the logs surface. Empty when there is none.
    pub async fn trace_lines(&self) -> Vec<TraceLine> {
        let state = self.state.read().await;
        match &state.analysis {
            Some(Analysis::Evaluation(result)) => result.trace_lines(),
            _ => Vec::new(),
        }
    }

    /// Produces a point-in-time projection for view code.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let scores = self.score_summary().await;
        let state = self.state.read().await;
        SessionSnapshot {
            id: self.id.clone(),
            created_at: self.created_at.clone(),
            phase: state.phase,
            view_mode: state.view_mode,
            turns: state.transcript.turns().to_vec(),
            editor_document: state.editor_document.clone(),
            preview_document: reconciler::resolve_preview(
                state.transcript.turns(),
                &state.editor_document,
            ),
            analysis: state.analysis.clone(),
            scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use judge_core::conversation::{TurnContent, TurnRole, WireMessage};
    use judge_core::evaluation::{ScoreDimension, ScoreTier, TierPolicy};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn sample_result() -> EvaluationResult {
        EvaluationResult {
            score_fidelity: 90,
            score_syntax: 85,
            score_accessibility: 70,
            score_responsiveness: None,
            score_visual: None,
            rationale: "ok".to_string(),
            final_judgement: "pass".to_string(),
            fixed_html: None,
            execution_trace: None,
        }
    }

    /// Backend that records every received transcript and replays queued
    /// replies (defaulting to a successful sample result).
    struct RecordingBackend {
        calls: Mutex<Vec<Vec<WireMessage>>>,
        replies: Mutex<VecDeque<std::result::Result<EvaluationResult, EvaluationFailure>>>,
    }

    impl RecordingBackend {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                replies: Mutex::new(VecDeque::new()),
            }
        }

        fn queue(&self, reply: std::result::Result<EvaluationResult, EvaluationFailure>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn last_call(&self) -> Vec<WireMessage> {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl EvaluationBackend for RecordingBackend {
        async fn send(
            &self,
            messages: &[WireMessage],
        ) -> std::result::Result<EvaluationResult, EvaluationFailure> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(sample_result()))
        }
    }

    /// Backend that blocks until released, pinning the session in the
    /// Evaluating phase.
    struct GatedBackend {
        gate: Notify,
        calls: Mutex<usize>,
    }

    impl GatedBackend {
        fn new() -> Self {
            Self {
                gate: Notify::new(),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl EvaluationBackend for GatedBackend {
        async fn send(
            &self,
            _messages: &[WireMessage],
        ) -> std::result::Result<EvaluationResult, EvaluationFailure> {
            *self.calls.lock().unwrap() += 1;
            self.gate.notified().await;
            Ok(sample_result())
        }
    }

    fn controller_with(backend: Arc<dyn EvaluationBackend>) -> ConversationController {
        ConversationController::new(backend, ScorePolicy::default())
    }

    #[tokio::test]
    async fn fresh_evaluation_resets_history_to_one_user_turn() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        controller.submit_evaluation("<p>one</p>").await.unwrap();
        controller.submit_chat("make it better").await.unwrap();
        controller.submit_evaluation("<p>two</p>").await.unwrap();

        let wire = backend.last_call();
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].content, "<p>two</p>");
    }

    #[tokio::test]
    async fn empty_document_is_rejected_without_a_dispatch() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        let outcome = controller.submit_evaluation("   ").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::EmptyInput);
        assert_eq!(controller.transcript_len().await, 0);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn submission_while_evaluating_is_a_no_op() {
        let backend = Arc::new(GatedBackend::new());
        let controller = Arc::new(ConversationController::new(
            backend.clone(),
            ScorePolicy::default(),
        ));

        let in_flight = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit_evaluation("<div>Hi</div>").await })
        };
        while !controller.is_busy().await {
            tokio::task::yield_now().await;
        }

        let outcome = controller.submit_chat("too early").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Busy);
        assert_eq!(controller.transcript_len().await, 1);
        assert_eq!(*backend.calls.lock().unwrap(), 1);

        backend.gate.notify_one();
        let first = in_flight.await.unwrap().unwrap();
        assert_eq!(first, SubmitOutcome::Completed);
        assert!(!controller.is_busy().await);
    }

    #[tokio::test]
    async fn follow_up_chat_keeps_prior_turns() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        controller.submit_evaluation("<div>Hi</div>").await.unwrap();
        controller.submit_chat("what about contrast?").await.unwrap();

        assert_eq!(controller.transcript_len().await, 4);
        let wire = backend.last_call();
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0].content, "<div>Hi</div>");
        assert_eq!(wire[2].content, "what about contrast?");
    }

    #[tokio::test]
    async fn failed_follow_up_keeps_the_last_good_analysis() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        controller.submit_evaluation("<div>Hi</div>").await.unwrap();
        backend.queue(Err(EvaluationFailure::new("connection reset")));
        controller.submit_chat("again please").await.unwrap();

        let analysis = controller.current_analysis().await.unwrap();
        let result = analysis.as_evaluation().expect("analysis should survive");
        assert_eq!(result.score_fidelity, 90);

        // the failed turn is still part of the audit trail
        assert_eq!(controller.transcript_len().await, 4);
        let snapshot = controller.snapshot().await;
        assert!(matches!(
            snapshot.turns[3].content,
            TurnContent::Failure(_)
        ));
    }

    #[tokio::test]
    async fn failed_fresh_evaluation_replaces_the_analysis() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        controller.submit_evaluation("<div>Hi</div>").await.unwrap();
        backend.queue(Err(EvaluationFailure::new("rate limited")));
        controller.submit_evaluation("<div>Hi</div>").await.unwrap();

        let analysis = controller.current_analysis().await.unwrap();
        assert_eq!(analysis.as_failure().unwrap().message, "rate limited");
        assert_eq!(controller.transcript_len().await, 2);
        assert!(!controller.is_busy().await);
    }

    #[tokio::test]
    async fn successful_evaluation_end_to_end() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        let outcome = controller.submit_evaluation("<div>Hi</div>").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed);

        assert_eq!(controller.transcript_len().await, 2);
        let analysis = controller.current_analysis().await.unwrap();
        assert_eq!(analysis.as_evaluation().unwrap().score_fidelity, 90);
        // no fix offered: preview falls back to the editor document
        assert_eq!(controller.preview_document().await, "<div>Hi</div>");
    }

    #[tokio::test]
    async fn preview_follows_the_most_recent_fix() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        let mut fixed = sample_result();
        fixed.fixed_html = Some("<div aria-label=\"hi\">Hi</div>".to_string());
        backend.queue(Ok(fixed));
        controller.submit_evaluation("<div>Hi</div>").await.unwrap();

        assert_eq!(
            controller.preview_document().await,
            "<div aria-label=\"hi\">Hi</div>"
        );
    }

    #[tokio::test]
    async fn apply_fix_updates_the_editor_without_touching_the_wire() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        controller.submit_evaluation("<div>Hi</div>").await.unwrap();
        controller.apply_fix("<div>Applied</div>").await;

        assert_eq!(controller.editor_document().await, "<div>Applied</div>");
        assert_eq!(controller.transcript_len().await, 3);

        // the notice is visible in the conversation but filtered from the wire
        controller.submit_chat("thanks").await.unwrap();
        let wire = backend.last_call();
        assert!(
            wire.iter().all(|m| m.content != "Applied evaluator fix to the editor document")
        );
    }

    #[tokio::test]
    async fn fresh_evaluation_forces_the_analysis_tab() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend);

        controller.set_view_mode(ViewMode::Logs).await;
        controller.submit_evaluation("<div>Hi</div>").await.unwrap();
        assert_eq!(controller.view_mode().await, ViewMode::Analysis);

        // follow-up chat leaves the active tab alone
        controller.set_view_mode(ViewMode::Chat).await;
        controller.submit_chat("and?").await.unwrap();
        assert_eq!(controller.view_mode().await, ViewMode::Chat);
    }

    #[tokio::test]
    async fn score_summary_uses_the_configured_policy() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        controller.submit_evaluation("<div>Hi</div>").await.unwrap();

        let rows = controller.score_summary().await;
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            ScoreEntry {
                dimension: ScoreDimension::Fidelity,
                score: 90,
                tier: ScoreTier::High,
            }
        );
        // 70 sits exactly on the default mid cutoff
        assert_eq!(rows[2].tier, ScoreTier::Mid);
    }

    #[tokio::test]
    async fn score_summary_pins_the_legacy_tier_scheme() {
        let backend = Arc::new(RecordingBackend::new());
        let policy = ScorePolicy::default().with_tiers(TierPolicy::legacy());
        let controller = ConversationController::new(backend.clone(), policy);

        let mut result = sample_result();
        result.score_accessibility = 65;
        backend.queue(Ok(result));
        controller.submit_evaluation("<div>Hi</div>").await.unwrap();

        let rows = controller.score_summary().await;
        // 65 is Low under the default cutoffs but Mid under the legacy 60
        assert_eq!(rows[2].score, 65);
        assert_eq!(rows[2].tier, ScoreTier::Mid);
    }

    #[tokio::test]
    async fn out_of_range_scores_are_clamped_on_arrival() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        let mut result = sample_result();
        result.score_syntax = 120;
        backend.queue(Ok(result));
        controller.submit_evaluation("<div>Hi</div>").await.unwrap();

        let analysis = controller.current_analysis().await.unwrap();
        assert_eq!(analysis.as_evaluation().unwrap().score_syntax, 100);
    }

    #[tokio::test]
    async fn trace_lines_surface_the_execution_log() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend.clone());

        let mut result = sample_result();
        result.execution_trace = Some(vec![
            ":rocket: Initialized analyzer engine".to_string(),
            ":warning: Skipping browser tests".to_string(),
        ]);
        backend.queue(Ok(result));
        controller.submit_evaluation("<div>Hi</div>").await.unwrap();

        let lines = controller.trace_lines().await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].icon.as_deref(), Some("rocket"));
    }

    #[tokio::test]
    async fn snapshot_reflects_the_session() {
        let backend = Arc::new(RecordingBackend::new());
        let controller = controller_with(backend);

        controller.submit_evaluation("<div>Hi</div>").await.unwrap();
        let snapshot = controller.snapshot().await;

        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.view_mode, ViewMode::Analysis);
        assert_eq!(snapshot.turns.len(), 2);
        assert_eq!(snapshot.turns[0].role, TurnRole::User);
        assert_eq!(snapshot.editor_document, "<div>Hi</div>");
        assert_eq!(snapshot.preview_document, "<div>Hi</div>");
        assert_eq!(snapshot.scores.len(), 3);
    }
}
