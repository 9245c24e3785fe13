//! HTTP interaction layer for the HTML Judge engine.
//!
//! This crate owns the single wire boundary of the engine: the
//! [`EvaluatorClient`] that posts transcripts to the evaluation endpoint,
//! and the configuration that names that endpoint.

pub mod config;
pub mod evaluator_client;

pub use config::EvaluatorConfig;
pub use evaluator_client::EvaluatorClient;
