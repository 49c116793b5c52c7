use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::daily_log::DailyLog;
use crate::models::forecast::ForecastDay;
use crate::scoring::DailyAnswers;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// The persistence collaborator: point lookups by (user, day) and
/// inclusive range scans. Any store satisfying these semantics works;
/// `PgStore` backs production, `MemoryStore` backs tests and DB-less runs.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert-or-patch the single log for (user, day). An existing record
    /// gets its `answers`/`score` replaced wholesale and `updated_at`
    /// bumped, keeping `created_at`; a new record gets both timestamps
    /// equal. Returns the post-write record.
    async fn upsert_daily_log(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        answers: DailyAnswers,
        score: Option<i32>,
    ) -> AppResult<DailyLog>;

    async fn get_daily_log(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<DailyLog>>;

    /// All logs with date in [start, end], ascending by date.
    async fn list_daily_logs(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailyLog>>;

    async fn has_daily_log(&self, user_id: Uuid, date: NaiveDate) -> AppResult<bool>;

    /// Generated forecast records with date in [start, end], ascending.
    async fn get_forecast_days(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ForecastDay>>;

    /// Whole-record upsert of a generated forecast set, atomically: either
    /// every entry lands or none does. Existing rows for the same (user,
    /// day) keep their identity and `created_at` but have all forecast
    /// content replaced.
    async fn replace_forecast_days(&self, user_id: Uuid, days: Vec<ForecastDay>) -> AppResult<()>;

    /// Flag every fresh generated record whose basis window contains
    /// `edited_date`. Returns how many records were flagged.
    async fn mark_forecasts_stale(&self, user_id: Uuid, edited_date: NaiveDate) -> AppResult<u64>;

    /// Readiness probe.
    async fn ping(&self) -> AppResult<()>;
}
