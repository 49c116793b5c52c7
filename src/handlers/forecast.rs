use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::dates::parse_day;
use crate::error::{AppError, AppResult};
use crate::forecast::ForecastOutcome;
use crate::models::forecast::{ForecastViewDay, GenerateForecastRequest};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub outcome: ForecastOutcome,
    pub days: Vec<ForecastViewDay>,
}

/// The rolling view: the trailing historical span ending today plus the
/// forward window. Runs a non-forced reconcile first, so the forecast
/// materializes automatically the moment the history window fills up.
pub async fn get_seven_day_forecast(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ForecastResponse>> {
    let today = Utc::now().date_naive();
    let outcome = state.reconciler.ensure_forecast(user_id, today, false).await?;

    let start = today - Duration::days(i64::from(state.reconciler.history_days()) - 1);
    let days = state.reconciler.view_range(user_id, start, today, today).await?;

    Ok(Json(ForecastResponse { outcome, days }))
}

/// Explicit regeneration. The reconcile runs on its own task so a client
/// that disconnects mid-request cannot abort a half-finished persist.
pub async fn generate_forecast(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    body: Option<Json<GenerateForecastRequest>>,
) -> AppResult<Json<ForecastResponse>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let today = Utc::now().date_naive();
    let force = body.force.unwrap_or(true);

    let end = match body.end_date.as_deref() {
        Some(s) => parse_day(s)?,
        None => today,
    };
    let start = match body.start_date.as_deref() {
        Some(s) => parse_day(s)?,
        None => today - Duration::days(i64::from(state.reconciler.history_days()) - 1),
    };
    if start > end {
        return Err(AppError::Validation("startDate must not be after endDate".into()));
    }

    let reconciler = state.reconciler.clone();
    let outcome = tokio::spawn(async move { reconciler.ensure_forecast(user_id, today, force).await })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))??;

    let days = state.reconciler.view_range(user_id, start, end, today).await?;

    Ok(Json(ForecastResponse { outcome, days }))
}
