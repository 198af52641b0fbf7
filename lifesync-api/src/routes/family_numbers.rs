/// Phone book endpoints (`/api/family-numbers`)
///
/// - `GET /` - List, primary first, filtered by `category`, `isEmergency`
/// - `GET /emergency`, `GET /category/:category`
/// - `POST /bulk` - Import an array of entries, all or nothing
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
use lifesync_shared::{
    auth::middleware::AuthContext,
    models::family_number::{
        BulkFamilyNumbers, CreateFamilyNumber, FamilyNumber, FamilyNumberFilter,
        UpdateFamilyNumber,
    },
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub category: Option<String>,
    pub is_emergency: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<FamilyNumber>>> {
    let filter = FamilyNumberFilter {
        category: params.category,
        is_emergency: query_flag(params.is_emergency.as_deref()),
    };

    Ok(Json(FamilyNumber::list(&state.db, ctx.family_id, &filter).await?))
}

pub async fn emergency(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<FamilyNumber>>> {
    Ok(Json(FamilyNumber::list_emergency(&state.db, ctx.family_id).await?))
}

pub async fn by_category(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(category): Path<String>,
) -> ApiResult<Json<Vec<FamilyNumber>>> {
    Ok(Json(
        FamilyNumber::list_by_category(&state.db, ctx.family_id, &category).await?,
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FamilyNumber>> {
    FamilyNumber::find_by_id(&state.db, ctx.family_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Family number"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateFamilyNumber>,
) -> ApiResult<(StatusCode, Json<FamilyNumber>)> {
    let number = FamilyNumber::create(&state.db, ctx.family_id, ctx.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(number)))
}

/// Import several entries at once
///
/// Every entry is validated before anything is written, and the inserts run
/// in one transaction.
pub async fn create_bulk(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<BulkFamilyNumbers>,
) -> ApiResult<(StatusCode, Json<Vec<FamilyNumber>>)> {
    let numbers =
        FamilyNumber::create_many(&state.db, ctx.family_id, ctx.user_id, req.entries).await?;

    tracing::info!(family_id = %ctx.family_id, count = numbers.len(), "Family numbers imported");

    Ok((StatusCode::CREATED, Json(numbers)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateFamilyNumber>,
) -> ApiResult<Json<FamilyNumber>> {
    FamilyNumber::update(&state.db, ctx.family_id, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Family number"))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !FamilyNumber::delete(&state.db, ctx.family_id, id).await? {
        return Err(ApiError::not_found("Family number"));
    }

    tracing::info!(family_id = %ctx.family_id, number_id = %id, "Family number deleted");

    Ok(Json(MessageResponse::deleted("Family number")))
}
