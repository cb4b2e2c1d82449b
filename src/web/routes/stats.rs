use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::{
    model::{
        ResourceTyped,
        entity::{UserProfile, UserStatsRow},
    },
    web::{
        AppState, RequestContext, WebError, WebResult, dto::stats::StatsResponse,
        error::ErrorResponse, middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/stats", get(user_stats_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/user/stats",
    description = "Dashboard summary for the caller: four stat cards plus the raw aggregate. Creates the user profile on first contact.",
    responses(
        (status = 200, description = "Stats collected", body = StatsResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "user",
    security(
        ("cookie" = [])
    )
)]
pub async fn user_stats_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    UserProfile::ensure_exists(state.pool(), user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserProfile::get_resource_type(), e))?;

    let raw = UserStatsRow::fetch(state.pool(), user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserProfile::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(StatsResponse::ok(user.user_id(), raw))))
}
