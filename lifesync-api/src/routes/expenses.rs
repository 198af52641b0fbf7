/// Expense endpoints (`/api/expenses`)
///
/// - `GET /` - List, filtered by `category`, `startDate`, `endDate`, `limit`
/// - `GET /summary/monthly?month&year` - Totals per category
/// - `GET /:id`, `POST /`, `PUT /:id`, `DELETE /:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::{parse_end, parse_limit, parse_month, parse_start, MessageResponse, MonthParams},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use lifesync_shared::{
    auth::middleware::AuthContext,
    models::expense::{CreateExpense, Expense, ExpenseFilter, MonthlyExpenseSummary, UpdateExpense},
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> ApiResult<ExpenseFilter> {
        Ok(ExpenseFilter {
            start_date: parse_start("startDate", self.start_date.as_deref())?,
            end_date: parse_end("endDate", self.end_date.as_deref())?,
            limit: parse_limit(self.limit.as_deref())?,
            category: self.category,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Expense>>> {
    let filter = params.into_filter()?;
    let expenses = Expense::list(&state.db, ctx.family_id, &filter).await?;
    Ok(Json(expenses))
}

/// Category totals for one calendar month
pub async fn monthly_summary(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<MonthParams>,
) -> ApiResult<Json<MonthlyExpenseSummary>> {
    let (start, end) = parse_month(params.month.as_deref(), params.year.as_deref())?;
    let totals = Expense::totals_by_category(&state.db, ctx.family_id, start, end).await?;
    Ok(Json(MonthlyExpenseSummary::from_totals(totals)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Expense>> {
    Expense::find_by_id(&state.db, ctx.family_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateExpense>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let expense = Expense::create(&state.db, ctx.family_id, ctx.user_id, req).await?;

    tracing::debug!(family_id = %ctx.family_id, expense_id = %expense.id, "Expense created");

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateExpense>,
) -> ApiResult<Json<Expense>> {
    Expense::update(&state.db, ctx.family_id, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense"))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Expense::delete(&state.db, ctx.family_id, id).await? {
        return Err(ApiError::not_found("Expense"));
    }

    tracing::info!(family_id = %ctx.family_id, expense_id = %id, "Expense deleted");

    Ok(Json(MessageResponse::deleted("Expense")))
}
