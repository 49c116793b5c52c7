use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::models::forecast::ForecastDay;
use crate::scoring::DailyAnswers;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct DailyLogRow {
    id: Uuid,
    user_id: Uuid,
    log_date: NaiveDate,
    answers: Json<DailyAnswers>,
    score: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DailyLogRow> for DailyLog {
    fn from(row: DailyLogRow) -> Self {
        DailyLog {
            id: row.id,
            user_id: row.user_id,
            date: row.log_date,
            answers: row.answers.0,
            score: row.score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn upsert_daily_log(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        answers: DailyAnswers,
        score: Option<i32>,
    ) -> AppResult<DailyLog> {
        // Unique (user_id, log_date): racing writes collapse into one row,
        // last write wins.
        let row = sqlx::query_as::<_, DailyLogRow>(
            r#"
            INSERT INTO daily_logs (id, user_id, log_date, answers, score)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, log_date) DO UPDATE SET
                answers = EXCLUDED.answers,
                score = EXCLUDED.score,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(date)
        .bind(Json(&answers))
        .bind(score)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_daily_log(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<DailyLog>> {
        let row = sqlx::query_as::<_, DailyLogRow>(
            "SELECT * FROM daily_logs WHERE user_id = $1 AND log_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_daily_logs(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailyLog>> {
        let rows = sqlx::query_as::<_, DailyLogRow>(
            r#"
            SELECT * FROM daily_logs
            WHERE user_id = $1 AND log_date BETWEEN $2 AND $3
            ORDER BY log_date ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn has_daily_log(&self, user_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM daily_logs WHERE user_id = $1 AND log_date = $2)",
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn get_forecast_days(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ForecastDay>> {
        let days = sqlx::query_as::<_, ForecastDay>(
            r#"
            SELECT * FROM forecast_days
            WHERE user_id = $1 AND forecast_date BETWEEN $2 AND $3
            ORDER BY forecast_date ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(days)
    }

    async fn replace_forecast_days(&self, user_id: Uuid, days: Vec<ForecastDay>) -> AppResult<()> {
        // One transaction: the whole generated set lands or none of it.
        let mut tx = self.pool.begin().await?;

        for day in days {
            sqlx::query(
                r#"
                INSERT INTO forecast_days
                    (id, user_id, forecast_date, emotion_score, description, trend,
                     details, recommendation, confidence, is_stale, basis_start, basis_end)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (user_id, forecast_date) DO UPDATE SET
                    emotion_score = EXCLUDED.emotion_score,
                    description = EXCLUDED.description,
                    trend = EXCLUDED.trend,
                    details = EXCLUDED.details,
                    recommendation = EXCLUDED.recommendation,
                    confidence = EXCLUDED.confidence,
                    is_stale = EXCLUDED.is_stale,
                    basis_start = EXCLUDED.basis_start,
                    basis_end = EXCLUDED.basis_end,
                    updated_at = NOW()
                "#,
            )
            .bind(day.id)
            .bind(user_id)
            .bind(day.date)
            .bind(day.emotion_score)
            .bind(day.description)
            .bind(day.trend)
            .bind(day.details)
            .bind(day.recommendation)
            .bind(day.confidence)
            .bind(day.is_stale)
            .bind(day.basis_start)
            .bind(day.basis_end)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn mark_forecasts_stale(&self, user_id: Uuid, edited_date: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE forecast_days SET is_stale = TRUE, updated_at = NOW()
            WHERE user_id = $1
              AND is_stale = FALSE
              AND basis_start IS NOT NULL
              AND basis_end IS NOT NULL
              AND $2 BETWEEN basis_start AND basis_end
            "#,
        )
        .bind(user_id)
        .bind(edited_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
