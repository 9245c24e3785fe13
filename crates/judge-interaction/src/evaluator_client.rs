//! EvaluatorClient - HTTP implementation of the evaluation backend.
//!
//! This client posts the wire-format transcript to the evaluation
//! endpoint and decodes the structured reply. Every failure mode degrades
//! to an [`EvaluationFailure`]; nothing raises past this boundary.

use crate::config::EvaluatorConfig;
use async_trait::async_trait;
use judge_core::conversation::WireMessage;
use judge_core::evaluation::{EvaluationBackend, EvaluationFailure, EvaluationResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// HTTP client for the evaluation endpoint.
#[derive(Clone)]
pub struct EvaluatorClient {
    client: Client,
    endpoint_url: String,
}

impl EvaluatorClient {
    /// Creates a client for the given endpoint with reqwest's default
    /// transport settings.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint_url: endpoint_url.into(),
        }
    }

    /// Creates a client from a loaded configuration, applying its
    /// transport timeout.
    ///
    /// The timeout is the only bound on a hung call: the conversation
    /// controller imposes none of its own and performs no retry.
    pub fn from_config(config: &EvaluatorConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        })
    }

    async fn post_transcript(
        &self,
        request: &EvaluateRequest<'_>,
    ) -> Result<EvaluationResult, EvaluationFailure> {
        let response = self
            .client
            .post(&self.endpoint_url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "evaluation request could not be completed");
                EvaluationFailure::new(format!("Evaluation request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = failure_message(status, &body);
            tracing::warn!(status = %status, message = %message, "evaluation service rejected the transcript");
            return Err(EvaluationFailure::new(message));
        }

        response.json::<EvaluationResult>().await.map_err(|err| {
            tracing::warn!(error = %err, "evaluation response did not match the expected shape");
            EvaluationFailure::new(format!("Failed to parse evaluation response: {err}"))
        })
    }
}

#[async_trait]
impl EvaluationBackend for EvaluatorClient {
    async fn send(
        &self,
        messages: &[WireMessage],
    ) -> Result<EvaluationResult, EvaluationFailure> {
        tracing::debug!(turns = messages.len(), "dispatching transcript to evaluator");
        self.post_transcript(&EvaluateRequest { messages }).await
    }
}

/// Body of the POST request to the evaluation endpoint.
#[derive(Serialize)]
struct EvaluateRequest<'a> {
    messages: &'a [WireMessage],
}

/// Structured failure reason the endpoint attaches to non-success
/// responses when it can.
#[derive(Deserialize)]
struct FailureBody {
    detail: Option<String>,
}

/// Derives the best available failure message from a non-success response.
///
/// Fallback tiers: structured `detail` field, then the raw body text,
/// then a generic message naming the status.
fn failure_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<FailureBody>(body) {
        if let Some(detail) = parsed.detail {
            if !detail.trim().is_empty() {
                return detail;
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    format!("Evaluation service returned HTTP {status}")
}
