use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::SessionRepository;
use super::service::{AuditSessionService, SessionError};
use super::session::SessionId;
use crate::workflows::audit::domain::{FieldUpdate, Platform};
use crate::workflows::audit::wizard::WizardTransition;

/// Checkbox toggle for a single platform.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformToggle {
    pub platform: Platform,
    pub selected: bool,
}

/// Router builder exposing the audit session lifecycle.
pub fn audit_router<R>(service: Arc<AuditSessionService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/audits", post(create_handler::<R>))
        .route("/api/v1/audits/:session_id", get(snapshot_handler::<R>))
        .route("/api/v1/audits/:session_id/start", post(start_handler::<R>))
        .route("/api/v1/audits/:session_id/answers", put(answer_handler::<R>))
        .route(
            "/api/v1/audits/:session_id/platforms",
            post(platform_handler::<R>),
        )
        .route("/api/v1/audits/:session_id/next", post(next_handler::<R>))
        .route("/api/v1/audits/:session_id/prev", post(prev_handler::<R>))
        .route(
            "/api/v1/audits/:session_id/analyze",
            post(analyze_handler::<R>),
        )
        .route(
            "/api/v1/audits/:session_id/results",
            get(results_handler::<R>),
        )
        .route(
            "/api/v1/audits/:session_id/contact",
            get(contact_handler::<R>),
        )
        .route(
            "/api/v1/audits/:session_id/restart",
            post(restart_handler::<R>),
        )
        .route(
            "/api/v1/audits/:session_id/notifications",
            get(notifications_handler::<R>),
        )
        .with_state(service)
}

fn error_response(error: SessionError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error.status_code(), axum::Json(payload)).into_response()
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.create() {
        Ok(session) => (StatusCode::CREATED, axum::Json(session.snapshot())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn snapshot_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, axum::Json(session.snapshot())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.start_audit(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, axum::Json(session.snapshot())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn answer_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<FieldUpdate>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.update_field(&SessionId(session_id), update) {
        Ok(session) => (StatusCode::OK, axum::Json(session.snapshot())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn platform_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(toggle): axum::Json<PlatformToggle>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.toggle_platform(&SessionId(session_id), toggle.platform, toggle.selected) {
        Ok(session) => (StatusCode::OK, axum::Json(session.snapshot())).into_response(),
        Err(err) => error_response(err),
    }
}

/// Blocked transitions answer 422 with the snapshot so the form can render field errors.
pub(crate) async fn next_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.advance(&SessionId(session_id)) {
        Ok(advance) => {
            let status = match advance.transition {
                WizardTransition::Blocked(_) => StatusCode::UNPROCESSABLE_ENTITY,
                WizardTransition::Advanced(_) | WizardTransition::Completed(_) => StatusCode::OK,
            };
            (status, axum::Json(advance.session.snapshot())).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn prev_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.prev(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, axum::Json(session.snapshot())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn analyze_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let id = SessionId(session_id);
    match service.analyze(&id) {
        Ok(_pending) => {
            let payload = json!({
                "session_id": id,
                "status": "analyzing",
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn results_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.results(&SessionId(session_id)) {
        Ok(presentation) => (StatusCode::OK, axum::Json(presentation)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn contact_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.contact_options(&SessionId(session_id)) {
        Ok(options) => (StatusCode::OK, axum::Json(options)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn restart_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.start_over(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, axum::Json(session.snapshot())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn notifications_handler<R>(
    State(service): State<Arc<AuditSessionService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.drain_notifications(&SessionId(session_id)) {
        Ok(notifications) => (StatusCode::OK, axum::Json(notifications)).into_response(),
        Err(err) => error_response(err),
    }
}
