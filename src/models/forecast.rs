use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "forecast_trend", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// A persisted generated forecast for one (user, future day).
///
/// `basis_start..=basis_end` is the historical window the record was
/// generated from; editing a daily log inside that window flips
/// `is_stale` until the next regeneration. Placeholder ("Forecast
/// Needed") entries are synthesized on read and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "forecast_date")]
    pub date: NaiveDate,
    pub emotion_score: Option<i32>,
    pub description: String,
    pub trend: Option<Trend>,
    pub details: String,
    pub recommendation: String,
    pub confidence: i32,
    pub is_stale: bool,
    pub basis_start: Option<NaiveDate>,
    pub basis_end: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of the rolling view: a past/today day backed by an actual
/// log, or a future day backed by a generated forecast or a placeholder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastViewDay {
    pub date: NaiveDate,
    pub is_past: bool,
    pub is_today: bool,
    pub is_future: bool,
    pub emotion_score: Option<i32>,
    pub description: String,
    pub trend: Option<Trend>,
    pub confidence: Option<i32>,
    pub details: Option<String>,
    pub recommendation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateForecastRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Explicit regeneration replaces existing records even when fresh.
    pub force: Option<bool>,
}
