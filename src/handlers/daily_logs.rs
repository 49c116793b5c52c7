use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::dates::{day_str, parse_day};
use crate::error::{AppError, AppResult};
use crate::models::daily_log::{DailyLog, DailyLogQuery, UpsertDailyLogRequest};
use crate::AppState;

pub async fn upsert_daily_log(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpsertDailyLogRequest>,
) -> AppResult<Json<DailyLog>> {
    let date = match body.date.as_deref() {
        Some(s) => parse_day(s)?,
        None => Utc::now().date_naive(),
    };
    body.answers.validate().map_err(AppError::Validation)?;

    let log = state.reconciler.record_log(user_id, date, body.answers).await?;
    Ok(Json(log))
}

pub async fn list_daily_logs(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<DailyLogQuery>,
) -> AppResult<Json<Vec<DailyLog>>> {
    let (start, end) = if let Some(year) = query.year {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::Validation(format!("year {year} is out of range")))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::Validation(format!("year {year} is out of range")))?;
        (start, end)
    } else {
        let end = match query.end_date.as_deref() {
            Some(s) => parse_day(s)?,
            None => Utc::now().date_naive(),
        };
        let start = match query.start_date.as_deref() {
            Some(s) => parse_day(s)?,
            None => end - chrono::Duration::days(30),
        };
        (start, end)
    };

    let logs = state.store.list_daily_logs(user_id, start, end).await?;
    Ok(Json(logs))
}

pub async fn get_daily_log(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(Uuid, String)>,
) -> AppResult<Json<DailyLog>> {
    let date = parse_day(&date)?;
    let log = state
        .store
        .get_daily_log(user_id, date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No log for {}", day_str(date))))?;
    Ok(Json(log))
}
