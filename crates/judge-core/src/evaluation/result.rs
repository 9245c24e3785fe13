//! Structured evaluation payload types.
//!
//! The wire schema carries three mandatory score dimensions; two more were
//! added in a later protocol version and may be absent. Absence of an
//! optional score is meaningful and must never collapse to zero, so the
//! optional dimensions are `Option` fields rather than defaulted integers.

use super::trace::TraceLine;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A score dimension reported by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "title_case")]
pub enum ScoreDimension {
    Fidelity,
    Syntax,
    Accessibility,
    Responsiveness,
    Visual,
}

impl ScoreDimension {
    /// The three dimensions every protocol version carries.
    pub const MANDATORY: [ScoreDimension; 3] = [
        ScoreDimension::Fidelity,
        ScoreDimension::Syntax,
        ScoreDimension::Accessibility,
    ];
}

/// The structured payload of a successful evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// 0-100 score for how well the HTML represents the desired output.
    pub score_fidelity: u8,
    /// 0-100 score for HTML syntax correctness.
    pub score_syntax: u8,
    /// 0-100 score for accessibility standards (WCAG).
    pub score_accessibility: u8,
    /// 0-100 score for responsive behavior. Absent in older protocol versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_responsiveness: Option<u8>,
    /// 0-100 score for visual quality. Absent in older protocol versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_visual: Option<u8>,
    /// Detailed explanation of the scores. May embed a fenced code block.
    pub rationale: String,
    /// Brief summary judgement.
    pub final_judgement: String,
    /// Corrected markup proposed by the evaluator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_html: Option<String>,
    /// Ordered raw log lines from the evaluation engine, in the
    /// `:icon: message` format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_trace: Option<Vec<String>>,
}

impl EvaluationResult {
    /// Returns the score for a dimension, `None` when the dimension is
    /// absent from this protocol version of the result.
    pub fn score(&self, dimension: ScoreDimension) -> Option<u8> {
        match dimension {
            ScoreDimension::Fidelity => Some(self.score_fidelity),
            ScoreDimension::Syntax => Some(self.score_syntax),
            ScoreDimension::Accessibility => Some(self.score_accessibility),
            ScoreDimension::Responsiveness => self.score_responsiveness,
            ScoreDimension::Visual => self.score_visual,
        }
    }

    /// Parses the raw execution trace into structured lines.
    ///
    /// Returns an empty vector when the result carries no trace.
    pub fn trace_lines(&self) -> Vec<TraceLine> {
        self.execution_trace
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|raw| TraceLine::parse(raw))
            .collect()
    }
}

/// Produced when the evaluation client cannot obtain or parse a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationFailure {
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl EvaluationFailure {
    /// Creates a failure from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What a session currently displays as its latest analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Analysis {
    /// The latest successful evaluation.
    Evaluation(EvaluationResult),
    /// The failure that took the place of an evaluation.
    Failure(EvaluationFailure),
}

impl Analysis {
    /// Returns the evaluation result if this analysis is a success.
    pub fn as_evaluation(&self) -> Option<&EvaluationResult> {
        match self {
            Self::Evaluation(result) => Some(result),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure if this analysis is a failure.
    pub fn as_failure(&self) -> Option<&EvaluationFailure> {
        match self {
            Self::Evaluation(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
