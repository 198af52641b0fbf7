/// Family member profile endpoints (`/api/family-members`)
///
/// Profiles are contact cards, not login accounts; member accounts live
/// under `/api/auth/family-members`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use lifesync_shared::{
    auth::middleware::AuthContext,
    models::family_member::{CreateFamilyMember, FamilyMember, UpdateFamilyMember},
};
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<FamilyMember>>> {
    Ok(Json(FamilyMember::list(&state.db, ctx.family_id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FamilyMember>> {
    FamilyMember::find_by_id(&state.db, ctx.family_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Family member"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateFamilyMember>,
) -> ApiResult<(StatusCode, Json<FamilyMember>)> {
    let member = FamilyMember::create(&state.db, ctx.family_id, ctx.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateFamilyMember>,
) -> ApiResult<Json<FamilyMember>> {
    FamilyMember::update(&state.db, ctx.family_id, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Family member"))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !FamilyMember::delete(&state.db, ctx.family_id, id).await? {
        return Err(ApiError::not_found("Family member"));
    }

    tracing::info!(family_id = %ctx.family_id, member_id = %id, "Family member profile deleted");

    Ok(Json(MessageResponse::deleted("Family member")))
}
