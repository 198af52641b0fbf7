/// Health record endpoints (`/api/health-records`)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::MessageResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use lifesync_shared::{
    auth::middleware::AuthContext,
    models::health_record::{
        CreateHealthRecord, HealthRecord, HealthRecordFilter, UpdateHealthRecord,
    },
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub member_name: Option<String>,
    pub record_type: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<HealthRecord>>> {
    let filter = HealthRecordFilter {
        member_name: params.member_name,
        record_type: params.record_type,
    };

    Ok(Json(HealthRecord::list(&state.db, ctx.family_id, &filter).await?))
}

/// Records with a next visit from now on, soonest first
pub async fn upcoming_visits(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<HealthRecord>>> {
    Ok(Json(
        HealthRecord::list_upcoming_visits(&state.db, ctx.family_id, Utc::now()).await?,
    ))
}

pub async fn for_member(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(member_name): Path<String>,
) -> ApiResult<Json<Vec<HealthRecord>>> {
    Ok(Json(
        HealthRecord::list_for_member(&state.db, ctx.family_id, &member_name).await?,
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<HealthRecord>> {
    HealthRecord::find_by_id(&state.db, ctx.family_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Health record"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateHealthRecord>,
) -> ApiResult<(StatusCode, Json<HealthRecord>)> {
    let record = HealthRecord::create(&state.db, ctx.family_id, ctx.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateHealthRecord>,
) -> ApiResult<Json<HealthRecord>> {
    HealthRecord::update(&state.db, ctx.family_id, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Health record"))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !HealthRecord::delete(&state.db, ctx.family_id, id).await? {
        return Err(ApiError::not_found("Health record"));
    }

    tracing::info!(family_id = %ctx.family_id, record_id = %id, "Health record deleted");

    Ok(Json(MessageResponse::deleted("Health record")))
}
