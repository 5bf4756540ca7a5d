use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use triage_ai::triage::{
    EscalationAlert, EscalationNotifier, NotifyError, RepositoryError, ScoringStrategy,
    SessionId, SessionRecord, SessionRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for InMemorySessionRepository {
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
        if guard.contains_key(&record.session_id) {
            guard.insert(record.session_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEscalationNotifier {
    events: Arc<Mutex<Vec<EscalationAlert>>>,
}

impl EscalationNotifier for InMemoryEscalationNotifier {
    fn publish(&self, alert: EscalationAlert) -> Result<(), NotifyError> {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryEscalationNotifier {
    pub(crate) fn events(&self) -> Vec<EscalationAlert> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

pub(crate) fn parse_strategy(raw: &str) -> Result<ScoringStrategy, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "weighted_keyword" => Ok(ScoringStrategy::WeightedKeyword),
        "yes_ratio" => Ok(ScoringStrategy::YesRatio),
        other => Err(format!(
            "unknown strategy '{other}', expected weighted_keyword or yes_ratio"
        )),
    }
}
