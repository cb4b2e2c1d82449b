use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    model::{
        DatabaseError, ResourceTyped, check_access,
        entity::{MentorshipSession, SessionRequest, SessionType},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            MessageResponse,
            mentorship::{SessionCreatedResponse, SessionListResponse, SessionRequestBody},
        },
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route(
            "/sessions",
            get(sessions_list_handler).post(sessions_request_handler),
        )
        .route("/sessions/{id}", axum::routing::delete(sessions_cancel_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/mentorship/sessions",
    description = "List the caller's mentorship sessions, newest first.",
    responses(
        (status = 200, description = "Sessions collected", body = SessionListResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "mentorship",
    security(
        ("cookie" = [])
    )
)]
pub async fn sessions_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let sessions = MentorshipSession::list_for_user(state.pool(), user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(MentorshipSession::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(SessionListResponse::ok(sessions))))
}

#[utoipa::path(
    post,
    path = "/api/v1/mentorship/sessions",
    request_body = SessionRequestBody,
    description = "Request a mentorship session. A mentor and a slot are attached later by the help desk.",
    responses(
        (status = 201, description = "Session requested", body = SessionCreatedResponse),
        (status = 400, description = "Missing topic or unknown session type", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "mentorship",
    security(
        ("cookie" = [])
    )
)]
pub async fn sessions_request_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<SessionRequestBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if payload.topic.trim().is_empty() {
        return Err(WebError::validation_missing_field("topic"));
    }
    let session_type = SessionType::try_from(payload.session_type.as_str())
        .map_err(|_| WebError::validation_invalid_session_type(&payload.session_type))?;

    let data = SessionRequest {
        topic: payload.topic,
        session_type,
    };
    let created = MentorshipSession::request(state.pool(), user.user_id(), data)
        .await
        .map_err(|e| WebError::resource_fetch_error(MentorshipSession::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(SessionCreatedResponse::ok(created))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/mentorship/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "ID of the session to cancel")
    ),
    description = "Cancel an own session. Completed or cancelled sessions stay as history and cannot be cancelled again.",
    responses(
        (status = 200, description = "Session cancelled", body = MessageResponse),
        (status = 400, description = "Session already closed", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Not your session", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "mentorship",
    security(
        ("cookie" = [])
    )
)]
pub async fn sessions_cancel_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let session = MentorshipSession::find_by_id(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(MentorshipSession::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(MentorshipSession::get_resource_type()))?;

    check_access(state.pool(), user, &session, user.user_id())
        .await
        .map_err(|e| {
            if let DatabaseError::Forbidden = e {
                WebError::resource_forbidden(MentorshipSession::get_resource_type())
            } else {
                WebError::resource_fetch_error(MentorshipSession::get_resource_type(), e)
            }
        })?;

    if session.is_closed() {
        return Err(WebError::session_closed());
    }

    session
        .cancel(state.pool())
        .await
        .map_err(|e| WebError::resource_fetch_error(MentorshipSession::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::ok("Mentorship session cancelled.")),
    ))
}
