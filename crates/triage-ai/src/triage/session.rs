use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerValue, ConditionTag, Question, QuestionId, Response};
use super::questions::QuestionBank;

const DEFAULT_MINIMUM_ANSWERS: usize = 2;

/// Finalization gate for interactive sessions. A session must cover the
/// full active question set and carry at least `minimum_answers` responses
/// before an assessment may be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPolicy {
    pub minimum_answers: usize,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            minimum_answers: DEFAULT_MINIMUM_ANSWERS,
        }
    }
}

/// Error raised while recording answers or gating finalization.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("question '{0}' is not in the active question set")]
    UnknownQuestion(QuestionId),
    #[error("question '{0}' already has a recorded answer")]
    DuplicateAnswer(QuestionId),
    #[error("unanswered questions remain in the active set")]
    QuestionnaireIncomplete,
    #[error("assessment requires at least {required} answers, only {answered} recorded")]
    MinimumAnswersNotMet { answered: usize, required: usize },
}

/// Sequential answer collection against a shared question bank.
///
/// Answers are write-once and kept in asking order. Recording an answer can
/// grow the active set through follow-up rules, so completion is always
/// re-derived from the current responses rather than a fixed count.
#[derive(Debug, Clone)]
pub struct TriageSession {
    bank: Arc<QuestionBank>,
    history: BTreeSet<ConditionTag>,
    responses: Vec<Response>,
    policy: CompletionPolicy,
}

impl TriageSession {
    pub fn new(bank: Arc<QuestionBank>, history: impl IntoIterator<Item = ConditionTag>) -> Self {
        Self::with_policy(bank, history, CompletionPolicy::default())
    }

    pub fn with_policy(
        bank: Arc<QuestionBank>,
        history: impl IntoIterator<Item = ConditionTag>,
        policy: CompletionPolicy,
    ) -> Self {
        Self {
            bank,
            history: history.into_iter().collect(),
            responses: Vec::new(),
            policy,
        }
    }

    pub fn history(&self) -> &BTreeSet<ConditionTag> {
        &self.history
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    /// The ordered question set as of the answers recorded so far.
    pub fn active_questions(&self) -> Vec<Question> {
        self.bank.active_questions(&self.history, &self.responses)
    }

    /// First active question without a recorded answer, `None` once the
    /// session is complete.
    pub fn next_question(&self) -> Option<Question> {
        self.active_questions()
            .into_iter()
            .find(|question| !self.has_answer(&question.id))
    }

    /// Whether every active question has an answer. The active set is a
    /// pure function of history and responses, so recomputing it here after
    /// the latest answer is exactly the fixed-point check: a second
    /// recomputation with unchanged responses cannot reveal new questions.
    pub fn is_complete(&self) -> bool {
        self.active_questions()
            .iter()
            .all(|question| self.has_answer(&question.id))
    }

    /// Record a write-once answer to an active question.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        answer: AnswerValue,
    ) -> Result<(), SessionError> {
        let active = self.active_questions();
        if !active.iter().any(|question| question.id == question_id) {
            return Err(SessionError::UnknownQuestion(question_id));
        }
        if self.has_answer(&question_id) {
            return Err(SessionError::DuplicateAnswer(question_id));
        }

        self.responses.push(Response {
            question_id,
            answer,
        });
        Ok(())
    }

    /// Gate an assessment: the questionnaire must be at its fixed point and
    /// the minimum-answers policy satisfied.
    pub fn ready_for_assessment(&self) -> Result<(), SessionError> {
        if !self.is_complete() {
            return Err(SessionError::QuestionnaireIncomplete);
        }
        if self.responses.len() < self.policy.minimum_answers {
            return Err(SessionError::MinimumAnswersNotMet {
                answered: self.responses.len(),
                required: self.policy.minimum_answers,
            });
        }
        Ok(())
    }

    fn has_answer(&self, question_id: &QuestionId) -> bool {
        self.responses
            .iter()
            .any(|response| &response.question_id == question_id)
    }
}
