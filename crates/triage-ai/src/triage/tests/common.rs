use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response as HttpResponse;
use serde_json::Value;

use crate::triage::domain::{
    AnswerValue, AnswerWeights, ChoiceAnswer, ConditionTag, Question, Response, SessionId,
};
use crate::triage::questions::{ConditionRule, FollowUpRule, QuestionBank};
use crate::triage::repository::{
    EscalationAlert, EscalationNotifier, NotifyError, RepositoryError, SessionRecord,
    SessionRepository,
};
use crate::triage::router::triage_router;
use crate::triage::service::TriageService;

pub(super) fn yes() -> AnswerValue {
    AnswerValue::Choice(ChoiceAnswer::Yes)
}

pub(super) fn no() -> AnswerValue {
    AnswerValue::Choice(ChoiceAnswer::No)
}

pub(super) fn unsure() -> AnswerValue {
    AnswerValue::Choice(ChoiceAnswer::Unsure)
}

pub(super) fn text(raw: &str) -> AnswerValue {
    AnswerValue::Text(raw.to_string())
}

pub(super) fn tag(raw: &str) -> ConditionTag {
    ConditionTag::new(raw)
}

pub(super) fn responses(pairs: &[(&str, AnswerValue)]) -> Vec<Response> {
    pairs
        .iter()
        .map(|(id, answer)| Response::new(*id, answer.clone()))
        .collect()
}

pub(super) fn weights(yes: f64) -> AnswerWeights {
    AnswerWeights {
        yes,
        no: 0.0,
        unsure: yes / 2.0,
    }
}

/// Two-question bank with no conditional additions, for boundary tests
/// where the standard set would get in the way.
pub(super) fn flat_bank(yes_weights: &[f64]) -> QuestionBank {
    let base = yes_weights
        .iter()
        .enumerate()
        .map(|(index, weight)| {
            Question::yes_no_unsure(
                format!("b{}", index + 1),
                format!("Screening question {}", index + 1),
                weights(*weight),
            )
        })
        .collect();
    QuestionBank::new(base, Vec::new(), Vec::new()).expect("flat bank is valid")
}

/// Bank whose condition rule carries its own follow-up, to exercise
/// history-gated follow-up activation.
pub(super) fn gated_follow_up_bank() -> QuestionBank {
    let base = vec![Question::yes_no_unsure(
        "g1",
        "Do you smoke?",
        weights(1.0),
    )];
    let rule = ConditionRule {
        trigger_condition_id: tag("asthma"),
        extra_questions: vec![Question::yes_no_unsure(
            "a1",
            "Have you needed your inhaler more than usual?",
            weights(2.0),
        )],
        follow_ups: vec![FollowUpRule::on_yes(
            "a1",
            Question::yes_no_unsure(
                "a1_followup",
                "Did the extra doses fail to relieve your symptoms?",
                weights(2.0),
            ),
        )],
    };
    QuestionBank::new(base, vec![rule], Vec::new()).expect("gated bank is valid")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<EscalationAlert>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<EscalationAlert> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl EscalationNotifier for MemoryNotifier {
    fn publish(&self, alert: EscalationAlert) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl SessionRepository for ConflictRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct FailingNotifier;

impl EscalationNotifier for FailingNotifier {
    fn publish(&self, _alert: EscalationAlert) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("pager offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    TriageService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = TriageService::new(
        repository.clone(),
        notifier.clone(),
        QuestionBank::standard(),
    );
    (service, repository, notifier)
}

pub(super) fn triage_router_with_service(
    service: TriageService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    triage_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: HttpResponse) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
