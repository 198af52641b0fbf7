/// Task endpoints (`/api/tasks`)
///
/// - `GET /` - List, filtered by `status`, `priority`, `isCompleted`, `category`
/// - `GET /today` - Incomplete tasks due today (UTC)
/// - `GET /overdue` - Incomplete tasks due before today
/// - `PATCH /:id/complete` - Mark done
/// - `GET /:id`, `POST /`, `PUT /:id`, `DELETE /:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::{query_flag, MessageResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use lifesync_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskFilter, UpdateTask},
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub is_completed: Option<String>,
    pub category: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = TaskFilter {
        status: params.status,
        priority: params.priority,
        is_completed: query_flag(params.is_completed.as_deref()),
        category: params.category,
    };

    Ok(Json(Task::list(&state.db, ctx.family_id, &filter).await?))
}

pub async fn today(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(Task::list_due_today(&state.db, ctx.family_id, Utc::now()).await?))
}

pub async fn overdue(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(Task::list_overdue(&state.db, ctx.family_id, Utc::now()).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    Task::find_by_id(&state.db, ctx.family_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = Task::create(&state.db, ctx.family_id, ctx.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateTask>,
) -> ApiResult<Json<Task>> {
    Task::update(&state.db, ctx.family_id, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Task"))
}

pub async fn complete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::complete(&state.db, ctx.family_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task"))?;

    tracing::debug!(family_id = %ctx.family_id, task_id = %id, "Task completed");

    Ok(Json(task))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Task::delete(&state.db, ctx.family_id, id).await? {
        return Err(ApiError::not_found("Task"));
    }

    tracing::info!(family_id = %ctx.family_id, task_id = %id, "Task deleted");

    Ok(Json(MessageResponse::deleted("Task")))
}
