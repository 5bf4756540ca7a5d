//! Triage risk-scoring core.
//!
//! This crate owns the deterministic triage pipeline: assembling the active
//! question set from a fixed bank plus condition- and answer-driven
//! additions, collecting write-once answers across an interactive session,
//! and mapping a completed response set to a tiered risk assessment.
//!
//! **No UI or storage concerns**: rendering, persistence engines, and the
//! external language-model integration live with the callers. The HTTP
//! router exposed here is a thin facade over the pure triage service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod triage;
