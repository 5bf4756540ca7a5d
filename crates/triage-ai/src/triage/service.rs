use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    AnswerValue, Assessment, ConditionTag, Priority, Question, QuestionId, Response, SessionId,
    TriageStatus,
};
use super::questions::QuestionBank;
use super::repository::{
    EscalationAlert, EscalationNotifier, NotifyError, RepositoryError, SessionRecord,
    SessionRepository,
};
use super::scoring::{RiskScorer, ScoringError, ScoringStrategy};
use super::session::{CompletionPolicy, SessionError, TriageSession};

/// Service composing the question bank, session lifecycle, scorer, and
/// escalation hook.
pub struct TriageService<R, N> {
    bank: Arc<QuestionBank>,
    repository: Arc<R>,
    notifier: Arc<N>,
    policy: CompletionPolicy,
    default_strategy: ScoringStrategy,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("triage-{id:06}"))
}

impl<R, N> TriageService<R, N>
where
    R: SessionRepository + 'static,
    N: EscalationNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, bank: QuestionBank) -> Self {
        Self {
            bank: Arc::new(bank),
            repository,
            notifier,
            policy: CompletionPolicy::default(),
            default_strategy: ScoringStrategy::YesRatio,
        }
    }

    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_default_strategy(mut self, strategy: ScoringStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn default_strategy(&self) -> ScoringStrategy {
        self.default_strategy
    }

    /// Stateless personalization: the active question set for a declared
    /// history and the answers recorded so far, without touching storage.
    pub fn personalized_questions(
        &self,
        history: &BTreeSet<ConditionTag>,
        responses: &[Response],
    ) -> Vec<Question> {
        self.bank.active_questions(history, responses)
    }

    /// Open a new interactive session, returning the repository-backed
    /// record.
    pub fn start_session(
        &self,
        history: Vec<ConditionTag>,
    ) -> Result<SessionRecord, TriageServiceError> {
        let session = TriageSession::with_policy(self.bank.clone(), history, self.policy);
        let record = SessionRecord {
            session_id: next_session_id(),
            session,
            status: TriageStatus::InProgress,
            assessment: None,
            started_at: Utc::now(),
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Fetch a session and its current status for API responses.
    pub fn get(&self, session_id: &SessionId) -> Result<SessionRecord, TriageServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Record a write-once answer against an in-progress session.
    pub fn record_answer(
        &self,
        session_id: &SessionId,
        question_id: QuestionId,
        answer: AnswerValue,
    ) -> Result<SessionRecord, TriageServiceError> {
        let mut record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status == TriageStatus::Assessed {
            return Err(TriageServiceError::AlreadyAssessed(record.session_id));
        }

        record.session.record_answer(question_id, answer)?;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Finalize a session into an assessment and persist the outcome.
    ///
    /// Finalization is idempotent: once assessed, the stored assessment is
    /// returned unchanged regardless of the requested strategy.
    pub fn finalize(
        &self,
        session_id: &SessionId,
        strategy: Option<ScoringStrategy>,
    ) -> Result<Assessment, TriageServiceError> {
        let mut record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;

        if let Some(existing) = &record.assessment {
            return Ok(existing.clone());
        }

        record.session.ready_for_assessment()?;

        let strategy = strategy.unwrap_or(self.default_strategy);
        let scorer = RiskScorer::new(strategy);
        let questions = record.session.active_questions();
        let assessment = scorer.score(&questions, record.session.responses())?;

        record.status = TriageStatus::Assessed;
        record.assessment = Some(assessment.clone());
        self.repository.update(record)?;

        info!(
            session = %session_id,
            strategy = strategy.label(),
            priority = assessment.priority.label(),
            score = assessment.risk_score,
            "triage assessment finalized"
        );

        if assessment.priority == Priority::High {
            self.notifier.publish(EscalationAlert {
                session_id: session_id.clone(),
                priority: assessment.priority,
                risk_score: assessment.risk_score,
            })?;
        }

        Ok(assessment)
    }
}

/// Error raised by the triage service.
#[derive(Debug, thiserror::Error)]
pub enum TriageServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("session '{0}' has already been assessed")]
    AlreadyAssessed(SessionId),
}
