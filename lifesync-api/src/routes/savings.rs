/// Savings goal endpoints (`/api/savings`)
///
/// - `GET /` - List, filtered by `category`, `isCompleted`, `priority`
/// - `GET /summary` - Totals over goals still in progress
/// - `PATCH /:id/contribute` - Add `{ amount }` to the saved total
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
    models::{
        savings_goal::{
            CreateSavingsGoal, SavingsGoal, SavingsGoalFilter, SavingsGoalView, SavingsSummary,
            UpdateSavingsGoal,
        },
        AmountChange, AmountRequest,
    },
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub category: Option<String>,
    pub is_completed: Option<String>,
    pub priority: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<SavingsGoalView>>> {
    let filter = SavingsGoalFilter {
        category: params.category,
        is_completed: query_flag(params.is_completed.as_deref()),
        priority: params.priority,
    };

    let goals = SavingsGoal::list(&state.db, ctx.family_id, &filter).await?;
    Ok(Json(goals.into_iter().map(SavingsGoalView::from).collect()))
}

pub async fn summary(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<SavingsSummary>> {
    let goals = SavingsGoal::list_active(&state.db, ctx.family_id).await?;
    Ok(Json(SavingsSummary::from_goals(&goals)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SavingsGoalView>> {
    SavingsGoal::find_by_id(&state.db, ctx.family_id, id)
        .await?
        .map(|g| Json(SavingsGoalView::from(g)))
        .ok_or_else(|| ApiError::not_found("Savings goal"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateSavingsGoal>,
) -> ApiResult<(StatusCode, Json<SavingsGoalView>)> {
    let goal = SavingsGoal::create(&state.db, ctx.family_id, ctx.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(SavingsGoalView::from(goal))))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateSavingsGoal>,
) -> ApiResult<Json<SavingsGoalView>> {
    SavingsGoal::update(&state.db, ctx.family_id, id, req)
        .await?
        .map(|g| Json(SavingsGoalView::from(g)))
        .ok_or_else(|| ApiError::not_found("Savings goal"))
}

/// Add money to a goal
///
/// The goal is marked completed once the saved total reaches the target.
///
/// # Errors
///
/// - `404 Not Found`: no such goal in the family
/// - `400 Bad Request`: the saved total would become negative
pub async fn contribute(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AmountRequest>,
) -> ApiResult<Json<SavingsGoalView>> {
    match SavingsGoal::contribute(&state.db, ctx.family_id, id, req.amount).await? {
        AmountChange::Applied(goal) => {
            tracing::info!(
                family_id = %ctx.family_id,
                goal_id = %id,
                amount = req.amount,
                completed = goal.is_completed,
                "Savings contribution recorded"
            );
            Ok(Json(SavingsGoalView::from(goal)))
        }
        AmountChange::NotFound => Err(ApiError::not_found("Savings goal")),
        AmountChange::WouldBeNegative => Err(ApiError::BadRequest(
            "Current amount cannot be negative".to_string(),
        )),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !SavingsGoal::delete(&state.db, ctx.family_id, id).await? {
        return Err(ApiError::not_found("Savings goal"));
    }

    tracing::info!(family_id = %ctx.family_id, goal_id = %id, "Savings goal deleted");

    Ok(Json(MessageResponse::deleted("Savings goal")))
}
