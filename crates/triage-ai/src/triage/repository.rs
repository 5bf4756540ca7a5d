use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Assessment, Priority, Question, SessionId, TriageStatus};
use super::session::TriageSession;

/// Repository record containing the session, status, and assessment
/// outcome.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub session: TriageSession,
    pub status: TriageStatus,
    pub assessment: Option<Assessment>,
    pub started_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn status_view(&self) -> SessionStatusView {
        SessionStatusView {
            session_id: self.session_id.clone(),
            status: self.status.label(),
            answered: self.session.responses().len(),
            complete: self.session.is_complete(),
            next_question: self.session.next_question(),
            assessment: self.assessment.clone(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
/// The external system owns durable persistence; this core only defines the
/// seam.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound escalation hooks (e.g. a provider dashboard or
/// paging adapter) fired for high-priority assessments.
pub trait EscalationNotifier: Send + Sync {
    fn publish(&self, alert: EscalationAlert) -> Result<(), NotifyError>;
}

/// Escalation payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationAlert {
    pub session_id: SessionId,
    pub priority: Priority,
    pub risk_score: u8,
}

/// Escalation dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("escalation transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a session's exposed state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusView {
    pub session_id: SessionId,
    pub status: &'static str,
    pub answered: usize,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
}
