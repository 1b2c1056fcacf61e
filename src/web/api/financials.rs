use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::web::{
    AppState,
    auth::{Role, authorize},
    data::{
        fetch_financial_metrics, fetch_investor_events, fetch_revenue_breakdown,
        fetch_yearly_financials,
    },
    models::{
        FinancialMetricView, InvestorEventView, RevenueBreakdownView, YearlyFinancialView,
        timestamp_now,
    },
    responses::{ApiError, ApiResult, json_body, optional, required},
};

const DEFAULT_METRIC_ICON: &str = "fas fa-dollar-sign";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFinancialMetric {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    display_order: Option<i64>,
}

pub async fn list_financial_metrics(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<Vec<FinancialMetricView>>> {
    authorize(&state, &jar, Role::Employee).await?;
    let rows = fetch_financial_metrics(state.pool_ref()).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn create_financial_metric(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<NewFinancialMetric>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FinancialMetricView>)> {
    authorize(&state, &jar, Role::Admin).await?;
    let request = json_body(payload)?;

    let name = required(request.name, "name")?;
    let value = request
        .value
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::validation("value is required"))?;
    let description = request.description.unwrap_or_default();
    let icon = optional(request.icon).unwrap_or_else(|| DEFAULT_METRIC_ICON.to_string());
    let display_order = request.display_order.unwrap_or(0);
    let created_at = timestamp_now();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO financial_metrics (name, value, description, icon, display_order, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING id",
    )
    .bind(&name)
    .bind(value)
    .bind(&description)
    .bind(&icon)
    .bind(display_order)
    .bind(&created_at)
    .fetch_one(state.pool_ref())
    .await?;

    info!(metric_id = id, name = %name, "financial metric created");

    Ok((
        StatusCode::CREATED,
        Json(FinancialMetricView {
            id,
            name,
            value,
            description: Some(description),
            icon: Some(icon),
            display_order,
            created_at,
        }),
    ))
}

pub async fn list_revenue_breakdown(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<Vec<RevenueBreakdownView>>> {
    authorize(&state, &jar, Role::Employee).await?;
    let rows = fetch_revenue_breakdown(state.pool_ref()).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_yearly_financials(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<Vec<YearlyFinancialView>>> {
    authorize(&state, &jar, Role::Employee).await?;
    let rows = fetch_yearly_financials(state.pool_ref(), None).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_investor_events(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<Vec<InvestorEventView>>> {
    authorize(&state, &jar, Role::Employee).await?;
    let rows = fetch_investor_events(state.pool_ref()).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
