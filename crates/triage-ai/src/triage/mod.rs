//! Triage questionnaire assembly, answer collection, and risk scoring.
//!
//! The pipeline mirrors the interactive flow it serves: a [`QuestionBank`]
//! produces the active question set for a respondent's declared history and
//! answers so far, a [`TriageSession`] collects write-once answers until
//! the set stops growing, and a [`RiskScorer`] maps the finished responses
//! to a tiered [`Assessment`]. The [`TriageService`] composes those parts
//! behind repository and escalation seams for the HTTP facade.

pub mod domain;
pub mod external;
pub mod questions;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerValue, AnswerWeights, Assessment, ChoiceAnswer, ConditionTag, Priority, Question,
    QuestionId, QuestionKind, Response, SessionId, TriageStatus,
};
pub use external::{ExternalAnalysis, RiskFactors};
pub use questions::{ConditionRule, FollowUpRule, QuestionBank, QuestionBankError};
pub use repository::{
    EscalationAlert, EscalationNotifier, NotifyError, RepositoryError, SessionRecord,
    SessionRepository, SessionStatusView,
};
pub use router::triage_router;
pub use scoring::{RiskScorer, ScoringError, ScoringStrategy};
pub use service::{TriageService, TriageServiceError};
pub use session::{CompletionPolicy, SessionError, TriageSession};
