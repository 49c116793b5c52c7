use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::models::forecast::ForecastDay;
use crate::scoring::DailyAnswers;
use crate::store::Store;

/// In-process store with the same observable semantics as `PgStore`.
/// The maps are keyed by (user, day), so two racing upserts to the same
/// key can only ever leave one record; last write wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    logs: RwLock<HashMap<(Uuid, NaiveDate), DailyLog>>,
    forecasts: RwLock<HashMap<(Uuid, NaiveDate), ForecastDay>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_daily_log(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        answers: DailyAnswers,
        score: Option<i32>,
    ) -> AppResult<DailyLog> {
        let now = Utc::now();
        let mut logs = self.logs.write().await;
        let log = logs
            .entry((user_id, date))
            .and_modify(|existing| {
                existing.answers = answers.clone();
                existing.score = score;
                existing.updated_at = now;
            })
            .or_insert_with(|| DailyLog {
                id: Uuid::new_v4(),
                user_id,
                date,
                answers,
                score,
                created_at: now,
                updated_at: now,
            });
        Ok(log.clone())
    }

    async fn get_daily_log(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<DailyLog>> {
        Ok(self.logs.read().await.get(&(user_id, date)).cloned())
    }

    async fn list_daily_logs(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailyLog>> {
        let logs = self.logs.read().await;
        let mut out: Vec<DailyLog> = logs
            .values()
            .filter(|l| l.user_id == user_id && l.date >= start && l.date <= end)
            .cloned()
            .collect();
        out.sort_by_key(|l| l.date);
        Ok(out)
    }

    async fn has_daily_log(&self, user_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        Ok(self.logs.read().await.contains_key(&(user_id, date)))
    }

    async fn get_forecast_days(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ForecastDay>> {
        let forecasts = self.forecasts.read().await;
        let mut out: Vec<ForecastDay> = forecasts
            .values()
            .filter(|f| f.user_id == user_id && f.date >= start && f.date <= end)
            .cloned()
            .collect();
        out.sort_by_key(|f| f.date);
        Ok(out)
    }

    async fn replace_forecast_days(&self, user_id: Uuid, days: Vec<ForecastDay>) -> AppResult<()> {
        let now = Utc::now();
        let mut forecasts = self.forecasts.write().await;
        for mut day in days {
            day.user_id = user_id;
            match forecasts.get(&(user_id, day.date)) {
                Some(existing) => {
                    // Record identity survives regeneration; content does not.
                    day.id = existing.id;
                    day.created_at = existing.created_at;
                    day.updated_at = now;
                }
                None => {
                    day.created_at = now;
                    day.updated_at = now;
                }
            }
            forecasts.insert((user_id, day.date), day);
        }
        Ok(())
    }

    async fn mark_forecasts_stale(&self, user_id: Uuid, edited_date: NaiveDate) -> AppResult<u64> {
        let now = Utc::now();
        let mut forecasts = self.forecasts.write().await;
        let mut flagged = 0;
        for f in forecasts.values_mut() {
            if f.user_id != user_id || f.is_stale {
                continue;
            }
            let in_basis = matches!(
                (f.basis_start, f.basis_end),
                (Some(start), Some(end)) if start <= edited_date && edited_date <= end
            );
            if in_basis {
                f.is_stale = true;
                f.updated_at = now;
                flagged += 1;
            }
        }
        Ok(flagged)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
