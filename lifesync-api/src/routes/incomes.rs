/// Income endpoints (`/api/incomes`)

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
    models::income::{CreateIncome, Income, IncomeFilter, MonthlyIncomeSummary, UpdateIncome},
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub source: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Income>>> {
    let filter = IncomeFilter {
        start_date: parse_start("startDate", params.start_date.as_deref())?,
        end_date: parse_end("endDate", params.end_date.as_deref())?,
        limit: parse_limit(params.limit.as_deref())?,
        source: params.source,
    };

    Ok(Json(Income::list(&state.db, ctx.family_id, &filter).await?))
}

/// Source totals for one calendar month
pub async fn monthly_summary(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(params): Query<MonthParams>,
) -> ApiResult<Json<MonthlyIncomeSummary>> {
    let (start, end) = parse_month(params.month.as_deref(), params.year.as_deref())?;
    let totals = Income::totals_by_source(&state.db, ctx.family_id, start, end).await?;
    Ok(Json(MonthlyIncomeSummary::from_totals(totals)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Income>> {
    Income::find_by_id(&state.db, ctx.family_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Income"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateIncome>,
) -> ApiResult<(StatusCode, Json<Income>)> {
    let income = Income::create(&state.db, ctx.family_id, ctx.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(income)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateIncome>,
) -> ApiResult<Json<Income>> {
    Income::update(&state.db, ctx.family_id, id, req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Income"))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Income::delete(&state.db, ctx.family_id, id).await? {
        return Err(ApiError::not_found("Income"));
    }

    tracing::info!(family_id = %ctx.family_id, income_id = %id, "Income deleted");

    Ok(Json(MessageResponse::deleted("Income")))
}
