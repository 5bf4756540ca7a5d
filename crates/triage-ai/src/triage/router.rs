use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response as HttpResponse},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnswerValue, ConditionTag, QuestionId, Response, SessionId};
use super::repository::{EscalationNotifier, RepositoryError, SessionRepository};
use super::scoring::ScoringStrategy;
use super::service::{TriageService, TriageServiceError};
use super::session::SessionError;

/// Router builder exposing HTTP endpoints for question personalization and
/// interactive sessions.
pub fn triage_router<R, N>(service: Arc<TriageService<R, N>>) -> Router
where
    R: SessionRepository + 'static,
    N: EscalationNotifier + 'static,
{
    Router::new()
        .route("/api/v1/triage/questions", post(questions_handler::<R, N>))
        .route("/api/v1/triage/sessions", post(start_session_handler::<R, N>))
        .route(
            "/api/v1/triage/sessions/:session_id",
            get(session_status_handler::<R, N>),
        )
        .route(
            "/api/v1/triage/sessions/:session_id/answers",
            post(answer_handler::<R, N>),
        )
        .route(
            "/api/v1/triage/sessions/:session_id/assessment",
            post(assessment_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersonalizedQuestionsRequest {
    #[serde(default)]
    pub(crate) medical_history: Vec<ConditionTag>,
    #[serde(default)]
    pub(crate) answers: Vec<Response>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartSessionRequest {
    #[serde(default)]
    pub(crate) medical_history: Vec<ConditionTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerRequest {
    pub(crate) question_id: QuestionId,
    pub(crate) answer: AnswerValue,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssessmentRequest {
    #[serde(default)]
    pub(crate) strategy: Option<ScoringStrategy>,
}

pub(crate) async fn questions_handler<R, N>(
    State(service): State<Arc<TriageService<R, N>>>,
    axum::Json(request): axum::Json<PersonalizedQuestionsRequest>,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    N: EscalationNotifier + 'static,
{
    let history: BTreeSet<ConditionTag> = request.medical_history.into_iter().collect();
    let questions = service.personalized_questions(&history, &request.answers);
    (StatusCode::OK, axum::Json(json!({ "questions": questions }))).into_response()
}

pub(crate) async fn start_session_handler<R, N>(
    State(service): State<Arc<TriageService<R, N>>>,
    axum::Json(request): axum::Json<StartSessionRequest>,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    N: EscalationNotifier + 'static,
{
    match service.start_session(request.medical_history) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_status_handler<R, N>(
    State(service): State<Arc<TriageService<R, N>>>,
    Path(session_id): Path<String>,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    N: EscalationNotifier + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<R, N>(
    State(service): State<Arc<TriageService<R, N>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    N: EscalationNotifier + 'static,
{
    let session_id = SessionId(session_id);
    match service.record_answer(&session_id, request.question_id, request.answer) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assessment_handler<R, N>(
    State(service): State<Arc<TriageService<R, N>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> HttpResponse
where
    R: SessionRepository + 'static,
    N: EscalationNotifier + 'static,
{
    let session_id = SessionId(session_id);
    match service.finalize(&session_id, request.strategy) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TriageServiceError) -> HttpResponse {
    let status = match &error {
        TriageServiceError::Session(SessionError::DuplicateAnswer(_)) => StatusCode::CONFLICT,
        TriageServiceError::Session(SessionError::UnknownQuestion(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TriageServiceError::Session(SessionError::QuestionnaireIncomplete)
        | TriageServiceError::Session(SessionError::MinimumAnswersNotMet { .. })
        | TriageServiceError::AlreadyAssessed(_) => StatusCode::CONFLICT,
        TriageServiceError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TriageServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        TriageServiceError::Repository(_) | TriageServiceError::Notify(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
