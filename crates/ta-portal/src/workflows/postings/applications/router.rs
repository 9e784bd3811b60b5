use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::documents::DefaultDocumentPrompt;
use super::domain::{ApplicationId, ReviewAction, SubmissionPayload};
use super::roster::export_roster;
use super::service::{PortalService, ServiceError};
use super::store::StateStore;
use crate::workflows::postings::domain::PostingId;

/// Router builder exposing the student and professor HTTP surface.
pub fn portal_router<S, P>(service: Arc<PortalService<S, P>>) -> Router
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    Router::new()
        .route("/api/v1/postings", get(list_postings_handler::<S, P>))
        .route(
            "/api/v1/postings/:posting_id/applications",
            post(submit_handler::<S, P>),
        )
        .route(
            "/api/v1/postings/:posting_id/closed",
            put(set_closed_handler::<S, P>),
        )
        .route(
            "/api/v1/postings/:posting_id/roster.csv",
            get(roster_handler::<S, P>),
        )
        .route("/api/v1/applications", get(list_applications_handler::<S, P>))
        .route(
            "/api/v1/applications/:application_id/withdraw",
            post(withdraw_handler::<S, P>),
        )
        .route(
            "/api/v1/applications/:application_id",
            delete(delete_handler::<S, P>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(review_handler::<S, P>),
        )
        .route(
            "/api/v1/review/selected-posting",
            get(selected_posting_handler::<S, P>).put(select_posting_handler::<S, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub(crate) action: ReviewAction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClosedRequest {
    pub(crate) closed: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectPostingRequest {
    pub(crate) posting_id: PostingId,
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::UnknownPosting { .. } => StatusCode::NOT_FOUND,
        ServiceError::PostingClosed { .. } | ServiceError::Invariant(_) => StatusCode::CONFLICT,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn list_postings_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    Json(service.postings()).into_response()
}

pub(crate) async fn list_applications_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    Json(service.applications()).into_response()
}

pub(crate) async fn submit_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
    Path(posting_id): Path<String>,
    Json(payload): Json<SubmissionPayload>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    let posting_id = PostingId(posting_id);
    match service.submit_or_update(&posting_id, payload) {
        Ok((outcome, record)) => {
            let status = match outcome {
                super::ledger::SubmitOutcome::Created => StatusCode::CREATED,
                super::ledger::SubmitOutcome::Updated => StatusCode::OK,
            };
            let body = json!({
                "outcome": outcome.label(),
                "application": record,
            });
            (status, Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn withdraw_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    let id = ApplicationId(application_id);
    match service.withdraw(&id) {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => Json(json!({ "application_id": id.0, "status": "unchanged" })).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    let id = ApplicationId(application_id);
    match service.delete_withdrawn(&id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
    Path(application_id): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    let id = ApplicationId(application_id);
    match service.advance_status(&id, request.action) {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => Json(json!({ "application_id": id.0, "status": "unchanged" })).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_closed_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
    Path(posting_id): Path<String>,
    Json(request): Json<ClosedRequest>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    let id = PostingId(posting_id);
    match service.set_posting_closed(&id, request.closed) {
        Ok(posting) => Json(posting).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn roster_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
    Path(posting_id): Path<String>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    let id = PostingId(posting_id);
    let Some(posting) = service.posting(&id) else {
        let payload = json!({ "error": format!("no posting with id {id} exists") });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    match export_roster(&posting, &service.applications()) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            bytes,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn selected_posting_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    Json(json!({ "posting_id": service.selected_posting() })).into_response()
}

pub(crate) async fn select_posting_handler<S, P>(
    State(service): State<Arc<PortalService<S, P>>>,
    Json(request): Json<SelectPostingRequest>,
) -> Response
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    match service.select_posting(&request.posting_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}
