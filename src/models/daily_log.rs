use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::DailyAnswers;

/// One log per (user, calendar day). `score` is absent until the scoring
/// collaborator has produced one; `date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub answers: DailyAnswers,
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDailyLogRequest {
    /// `YYYY-MM-DD`; defaults to today when omitted.
    pub date: Option<String>,
    #[serde(default)]
    pub answers: DailyAnswers,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogQuery {
    pub year: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
