//! Reconciliation of evaluator replies into a single preview document.
//!
//! Assistant turns may or may not carry explicit fixed markup; this module
//! owns the policy that decides which markup is "the" current preview
//! document for a conversation history, and the score sanitation the
//! transport layer deliberately does not perform.

use crate::conversation::{Turn, TurnContent, TurnRole};
use crate::evaluation::result::EvaluationResult;
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a fenced code block tagged `html`.
///
/// Grammar: an opening ```` ```html ```` fence, a newline, the block
/// interior (possibly empty, possibly spanning lines), and a closing
/// ```` ``` ```` fence. The first match wins.
static HTML_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```html[ \t]*\r?\n(.*?)\r?\n?```").expect("html fence pattern"));

/// Extracts the interior of the first fenced block tagged `html`.
///
/// This is the informal, regex-based fallback used when an assistant turn
/// proposes markup in prose instead of the explicit `fixed_html` field.
/// It is a pure function so the grammar can be tested independently of
/// the reconciler's ordering logic.
pub fn extract_html_block(text: &str) -> Option<String> {
    HTML_FENCE
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Derives the document to preview from a conversation history.
///
/// The scan walks assistant turns most-recent-first:
///
/// 1. a non-empty `fixed_html` on the turn's result wins;
/// 2. otherwise the first fenced `html` block inside the turn's
///    `rationale` wins;
/// 3. if no assistant turn satisfies either rule, the current editor
///    document is the preview document.
///
/// The scan is lazy and restartable: it is recomputed from the full
/// history on every call and never cached, because any later turn can
/// supersede an earlier extraction.
///
/// The returned markup is attacker-controlled when the evaluated HTML
/// came from untrusted input; hosts must render it in a sandboxed,
/// non-privileged context without ambient authority.
pub fn resolve_preview(turns: &[Turn], editor_document: &str) -> String {
    for turn in turns.iter().rev() {
        if turn.role != TurnRole::Assistant {
            continue;
        }
        let TurnContent::Evaluation(result) = &turn.content else {
            continue;
        };
        if let Some(fixed) = result.fixed_html.as_deref() {
            if !fixed.trim().is_empty() {
                tracing::debug!("preview resolved from explicit fixed_html");
                return fixed.to_string();
            }
        }
        if let Some(block) = extract_html_block(&result.rationale) {
            tracing::debug!("preview resolved from fenced block in rationale");
            return block;
        }
    }
    editor_document.to_string()
}

/// Clamps out-of-range scores to the [0, 100] bound.
///
/// The transport layer decodes without validating bounds; sanitation is
/// policy and lives here. A score above 100 is clamped rather than
/// rejected so one out-of-range dimension does not discard a whole
/// evaluation.
pub fn sanitize_scores(result: &mut EvaluationResult) {
    let clamp = |label: &str, score: &mut u8| {
        if *score > 100 {
            tracing::warn!(score = *score, dimension = label, "clamping out-of-range score");
            *score = 100;
        }
    };
    clamp("fidelity", &mut result.score_fidelity);
    clamp("syntax", &mut result.score_syntax);
    clamp("accessibility", &mut result.score_accessibility);
    if let Some(score) = result.score_responsiveness.as_mut() {
        clamp("responsiveness", score);
    }
    if let Some(score) = result.score_visual.as_mut() {
        clamp("visual", score);
    }
}
