/// Budget endpoints (`/api/budgets`)
///
/// Budgets are returned with `usagePercent` and `isAlerting` computed from
/// the stored amounts.
///
/// - `GET /` - List, filtered by `month`, `year`, `isActive`
/// - `GET /current` - Active budgets of the current UTC month
/// - `GET /over-budget` - Current budgets with spent >= allocated
/// - `PATCH /:id/spend` - Add `{ amount }` to the spent total
/// - `GET /:id`, `POST /`, `PUT /:id`, `DELETE /:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::{parse_int, query_flag, MessageResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use lifesync_shared::{
    auth::middleware::AuthContext,
    models::{
        budget::{Budget, BudgetFilter, BudgetView, CreateBudget, UpdateBudget},
        AmountChange, AmountRequest,
    },
    period::current_period,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub month: Option<String>,
    pub year: Option<String>,
    pub is_active: Option<String>,
}

fn views(budgets: Vec<Budget>) -> Json<Vec<BudgetView>> {
    Json(budgets.into_iter().map(BudgetView::from).collect())
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<BudgetView>>> {
    let filter = BudgetFilter {
        month: parse_int("month", params.month.as_deref())?,
        year: parse_int("year", params.year.as_deref())?,
        is_active: query_flag(params.is_active.as_deref()),
    };

    Ok(views(Budget::list(&state.db, ctx.family_id, &filter).await?))
}

pub async fn current(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<BudgetView>>> {
    let (month, year) = current_period(Utc::now());
    Ok(views(
        Budget::list_active_for_period(&state.db, ctx.family_id, month, year).await?,
    ))
}

pub async fn over_budget(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<BudgetView>>> {
    let (month, year) = current_period(Utc::now());
    Ok(views(
        Budget::list_over_budget(&state.db, ctx.family_id, month, year).await?,
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BudgetView>> {
    Budget::find_by_id(&state.db, ctx.family_id, id)
        .await?
        .map(|b| Json(BudgetView::from(b)))
        .ok_or_else(|| ApiError::not_found("Budget"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateBudget>,
) -> ApiResult<(StatusCode, Json<BudgetView>)> {
    let budget = Budget::create(&state.db, ctx.family_id, ctx.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(BudgetView::from(budget))))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateBudget>,
) -> ApiResult<Json<BudgetView>> {
    Budget::update(&state.db, ctx.family_id, id, req)
        .await?
        .map(|b| Json(BudgetView::from(b)))
        .ok_or_else(|| ApiError::not_found("Budget"))
}

/// Record spending against a budget
///
/// Negative amounts reverse earlier spending, but the total never drops
/// below zero.
///
/// # Errors
///
/// - `404 Not Found`: no such budget in the family
/// - `400 Bad Request`: the spent total would become negative
pub async fn spend(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AmountRequest>,
) -> ApiResult<Json<BudgetView>> {
    match Budget::spend(&state.db, ctx.family_id, id, req.amount).await? {
        AmountChange::Applied(budget) => {
            if budget.is_alerting() {
                tracing::info!(
                    family_id = %ctx.family_id,
                    budget_id = %id,
                    usage = budget.usage_percent(),
                    "Budget reached its alert threshold"
                );
            }
            Ok(Json(BudgetView::from(budget)))
        }
        AmountChange::NotFound => Err(ApiError::not_found("Budget")),
        AmountChange::WouldBeNegative => Err(ApiError::BadRequest(
            "Spent amount cannot be negative".to_string(),
        )),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Budget::delete(&state.db, ctx.family_id, id).await? {
        return Err(ApiError::not_found("Budget"));
    }

    tracing::info!(family_id = %ctx.family_id, budget_id = %id, "Budget deleted");

    Ok(Json(MessageResponse::deleted("Budget")))
}
