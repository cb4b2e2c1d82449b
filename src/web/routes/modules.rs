use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, DatabaseError, ResourceTyped,
        entity::{
            CatalogFilter, DifficultyLevel, Enrollment, ModuleCatalogRow, ModuleCreate,
            TrainingModule,
        },
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            MessageResponse,
            modules::{EnrollResponse, ModuleCreateBody, ModuleCreatedResponse, ModuleListResponse},
        },
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(modules_list_handler).post(modules_create_handler))
        .route(
            "/{id}/enroll",
            post(modules_enroll_handler).delete(modules_unenroll_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct CatalogQuery {
    /// Case-insensitive category filter
    category: Option<String>,
    /// Exact-match difficulty filter
    difficulty: Option<String>,
    /// `true` limits the list to the caller's enrollments; ignored for
    /// anonymous callers
    enrolled: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/training-modules/",
    params(CatalogQuery),
    description = "List active training modules with lesson counts, enrollment counts and (for authenticated callers) per-user progress fields.",
    responses(
        (status = 200, description = "Catalog collected", body = ModuleListResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "training-modules",
)]
pub async fn modules_list_handler(
    ctx: RequestContext,
    Query(query): Query<CatalogQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user_id = ctx.maybe_user().map(|u| u.user_id());
    let filter = CatalogFilter {
        category: query.category,
        difficulty: query.difficulty,
        enrolled_only: query.enrolled.unwrap_or(false),
    };

    let rows = ModuleCatalogRow::fetch_filtered(state.pool(), user_id, &filter)
        .await
        .map_err(|e| WebError::resource_fetch_error(TrainingModule::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(ModuleListResponse::ok(rows))))
}

#[utoipa::path(
    post,
    path = "/api/v1/training-modules/",
    request_body = ModuleCreateBody,
    description = "Publish a new training module.",
    responses(
        (status = 201, description = "Module created", body = ModuleCreatedResponse),
        (status = 400, description = "Missing field or unknown difficulty level", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "training-modules",
    security(
        ("cookie" = [])
    )
)]
pub async fn modules_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<ModuleCreateBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    if payload.title.trim().is_empty() {
        return Err(WebError::validation_missing_field("title"));
    }
    if payload.category.trim().is_empty() {
        return Err(WebError::validation_missing_field("category"));
    }
    if DifficultyLevel::try_from(payload.difficulty_level.as_str()).is_err() {
        return Err(WebError::validation_invalid_difficulty(
            &payload.difficulty_level,
        ));
    }

    let data = ModuleCreate {
        title: payload.title,
        description: payload.description.unwrap_or_default(),
        difficulty_level: payload.difficulty_level,
        category: payload.category,
        estimated_duration: payload.estimated_duration,
        prerequisites: payload.prerequisites,
        thumbnail_url: payload.thumbnail_url,
    };

    let created = TrainingModule::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(TrainingModule::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(ModuleCreatedResponse::ok(created))))
}

#[utoipa::path(
    post,
    path = "/api/v1/training-modules/{id}/enroll",
    params(
        ("id" = Uuid, Path, description = "ID of the module to enroll in")
    ),
    description = "Enroll the caller in an active module. Creates the user profile on first contact.",
    responses(
        (status = 200, description = "Enrolled", body = EnrollResponse),
        (status = 400, description = "Already enrolled", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Module missing or inactive", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "training-modules",
    security(
        ("cookie" = [])
    )
)]
pub async fn modules_enroll_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let module = TrainingModule::find_active(state.pool(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(TrainingModule::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(TrainingModule::get_resource_type()))?;

    let existing = Enrollment::find_by_user_module(state.pool(), user.user_id(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;
    if existing.is_some() {
        return Err(WebError::already_enrolled());
    }

    // The constraint still wins a race the pre-check missed.
    let enrollment = match Enrollment::enroll(state.pool(), user.user_id(), id).await {
        Ok(enrollment) => enrollment,
        Err(DatabaseError::UniqueViolation) => return Err(WebError::already_enrolled()),
        Err(e) => {
            return Err(WebError::resource_fetch_error(
                Enrollment::get_resource_type(),
                e,
            ));
        }
    };

    Ok((StatusCode::OK, Json(EnrollResponse::ok(enrollment, module))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/training-modules/{id}/enroll",
    params(
        ("id" = Uuid, Path, description = "ID of the module to unenroll from")
    ),
    description = "Remove the caller's enrollment. Hard delete, progress is not archived.",
    responses(
        (status = 200, description = "Unenrolled", body = MessageResponse),
        (status = 400, description = "Not enrolled", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "training-modules",
    security(
        ("cookie" = [])
    )
)]
pub async fn modules_unenroll_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let existing = Enrollment::find_by_user_module(state.pool(), user.user_id(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;
    if existing.is_none() {
        return Err(WebError::not_enrolled());
    }

    Enrollment::unenroll(state.pool(), user.user_id(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::ok("Successfully unenrolled from module.")),
    ))
}
