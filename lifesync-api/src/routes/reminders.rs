/// Reminder endpoints (`/api/reminders`)
///
/// - `GET /` - List by due date, filtered by `isPaid`, `type`
/// - `GET /pending` - Unpaid reminders
/// - `GET /overdue` - Unpaid reminders already due
/// - `PATCH /:id/pay` - Mark paid now
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
    models::reminder::{CreateReminder, Reminder, ReminderFilter, UpdateReminder},
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub is_paid: Option<String>,
    #[serde(rename = "type")]
    pub reminder_type: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Reminder>>> {
    let filter = ReminderFilter {
        is_paid: query_flag(params.is_paid.as_deref()),
        reminder_type: params.reminder_type,
    };

    Ok(Json(Reminder::list(&state.db, ctx.family_id, &filter).await?))
}

pub async fn pending(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Reminder>>> {
    Ok(Json(Reminder::list_pending(&state.db, ctx.family_id).await?))
}

pub async fn overdue(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Reminder>>> {
    Ok(Json(Reminder::list_overdue(&state.db, ctx.family_id, Utc::now()).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Reminder>> {
    Reminder::find_by_id(&state.db, ctx.family_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Reminder"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateReminder>,
) -> ApiResult<(StatusCode, Json<Reminder>)> {
    let reminder = Reminder::create(&state.db, ctx.family_id, ctx.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateReminder>,
) -> ApiResult<Json<Reminder>> {
    Reminder::update(&state.db, ctx.family_id, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Reminder"))
}

pub async fn pay(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Reminder>> {
    let reminder = Reminder::mark_paid(&state.db, ctx.family_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Reminder"))?;

    tracing::info!(family_id = %ctx.family_id, reminder_id = %id, "Reminder paid");

    Ok(Json(reminder))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Reminder::delete(&state.db, ctx.family_id, id).await? {
        return Err(ApiError::not_found("Reminder"));
    }

    tracing::info!(family_id = %ctx.family_id, reminder_id = %id, "Reminder deleted");

    Ok(Json(MessageResponse::deleted("Reminder")))
}
