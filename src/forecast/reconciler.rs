use std::sync::Arc;

use anyhow::anyhow;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::dates;
use crate::error::{AppError, AppResult};
use crate::forecast::generator::{bucket_label, DayScore};
use crate::forecast::model::ForecastModel;
use crate::models::daily_log::DailyLog;
use crate::models::forecast::{ForecastDay, ForecastViewDay};
use crate::scoring::{DailyAnswers, Scorer};
use crate::store::Store;

pub const PLACEHOLDER_DESCRIPTION: &str = "Forecast Needed";
const NO_LOG_DESCRIPTION: &str = "No Log";

/// Result of one reconciliation pass over a user's forward window.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ForecastOutcome {
    /// The trailing historical window is not fully scored yet; future days
    /// stay placeholders and the model was not invoked.
    #[serde(rename_all = "camelCase")]
    MissingHistory { missing: Vec<NaiveDate> },
    /// Every forward day already has a fresh generated record.
    AlreadyFresh,
    /// The model ran and the forward window was replaced wholesale.
    #[serde(rename_all = "camelCase")]
    Generated { days: usize },
}

/// Explicit, callable reconciliation between daily logs and persisted
/// forecasts. Callers invoke it after every log mutation and on view
/// reads; nothing here is reactive or implicit.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn Store>,
    model: Arc<dyn ForecastModel>,
    scorer: Arc<dyn Scorer>,
    history_days: u32,
    forward_days: u32,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn Store>,
        model: Arc<dyn ForecastModel>,
        scorer: Arc<dyn Scorer>,
        history_days: u32,
        forward_days: u32,
    ) -> Self {
        Self {
            store,
            model,
            scorer,
            history_days,
            forward_days,
        }
    }

    pub fn forward_days(&self) -> u32 {
        self.forward_days
    }

    pub fn history_days(&self) -> u32 {
        self.history_days
    }

    /// Score and upsert one daily log, then invalidate any generated
    /// forecasts whose basis window contains the edited day.
    ///
    /// A scoring failure does not block the write: the answers persist
    /// with no score, to be rescored on a later submission.
    pub async fn record_log(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        answers: DailyAnswers,
    ) -> AppResult<DailyLog> {
        let score = match self.scorer.score(&answers).await {
            Ok(s) => Some(s),
            Err(AppError::ScoringFailed(e)) => {
                tracing::warn!(
                    user_id = %user_id,
                    date = %date,
                    error = %e,
                    "Scoring failed, persisting log without score"
                );
                None
            }
            Err(e) => return Err(e),
        };

        let log = self
            .store
            .upsert_daily_log(user_id, date, answers, score)
            .await?;

        let flagged = self.store.mark_forecasts_stale(user_id, date).await?;
        if flagged > 0 {
            tracing::info!(
                user_id = %user_id,
                date = %date,
                flagged,
                "History edit marked dependent forecasts stale"
            );
        }

        Ok(log)
    }

    /// Bring the forward window up to date.
    ///
    /// Generation only runs when every day of the trailing historical
    /// window has a scored log. Without `force`, an already-fresh forward
    /// window is left untouched, so automatic invocations are idempotent;
    /// with `force`, every forward record is regenerated and replaced.
    pub async fn ensure_forecast(
        &self,
        user_id: Uuid,
        today: NaiveDate,
        force: bool,
    ) -> AppResult<ForecastOutcome> {
        let window = dates::trailing_window(today, self.history_days);
        let targets = dates::forward_window(today, self.forward_days);
        if window.is_empty() || targets.is_empty() {
            return Ok(ForecastOutcome::AlreadyFresh);
        }

        let mut missing = Vec::new();
        for day in &window {
            if !self.store.has_daily_log(user_id, *day).await? {
                missing.push(*day);
            }
        }
        if !missing.is_empty() {
            return Ok(ForecastOutcome::MissingHistory { missing });
        }

        // Logs exist for the whole window; they must also carry real
        // scores before they can seed a forecast.
        let window_start = window[0];
        let window_end = *window.last().expect("window is non-empty");
        let logs = self
            .store
            .list_daily_logs(user_id, window_start, window_end)
            .await?;
        let past: Vec<DayScore> = logs
            .iter()
            .filter_map(|l| l.score.map(|score| DayScore { date: l.date, score }))
            .collect();
        let unscored: Vec<NaiveDate> = window
            .iter()
            .copied()
            .filter(|day| !past.iter().any(|p| p.date == *day))
            .collect();
        if !unscored.is_empty() {
            return Ok(ForecastOutcome::MissingHistory { missing: unscored });
        }

        if !force {
            let existing = self
                .store
                .get_forecast_days(user_id, targets[0], *targets.last().expect("targets non-empty"))
                .await?;
            let all_fresh = existing.len() == targets.len()
                && existing
                    .iter()
                    .all(|f| !f.is_stale && f.emotion_score.is_some());
            if all_fresh {
                return Ok(ForecastOutcome::AlreadyFresh);
            }
        }

        let generated = self
            .model
            .forecast(&past, &targets)
            .await
            .map_err(AppError::ForecastGenerationFailed)?;

        // All-or-nothing: a malformed model answer persists nothing.
        if generated.len() != targets.len() {
            return Err(AppError::ForecastGenerationFailed(anyhow!(
                "model returned {} entries for {} target dates",
                generated.len(),
                targets.len()
            )));
        }
        for (entry, target) in generated.iter().zip(&targets) {
            if entry.date != *target {
                return Err(AppError::ForecastGenerationFailed(anyhow!(
                    "model returned entry for {} where {} was requested",
                    entry.date,
                    target
                )));
            }
            if !(0..=100).contains(&entry.emotion_score) {
                return Err(AppError::ForecastGenerationFailed(anyhow!(
                    "model returned out-of-range score {} for {}",
                    entry.emotion_score,
                    entry.date
                )));
            }
        }

        let now = Utc::now();
        let records: Vec<ForecastDay> = generated
            .into_iter()
            .map(|g| ForecastDay {
                id: Uuid::new_v4(),
                user_id,
                date: g.date,
                emotion_score: Some(g.emotion_score),
                description: g.description,
                trend: Some(g.trend),
                details: g.details,
                recommendation: g.recommendation,
                confidence: g.confidence,
                is_stale: false,
                basis_start: Some(window_start),
                basis_end: Some(window_end),
                created_at: now,
                updated_at: now,
            })
            .collect();
        let count = records.len();

        self.store.replace_forecast_days(user_id, records).await?;

        tracing::info!(
            user_id = %user_id,
            days = count,
            forced = force,
            "Forecast window regenerated"
        );
        Ok(ForecastOutcome::Generated { days: count })
    }

    /// The rolling view: every day from `start` through `end` plus the
    /// forward window, ascending and gap-free. Past/today entries carry
    /// actual log scores (null when missing, never omitted); future
    /// entries carry generated forecasts or an unpersisted placeholder.
    pub async fn view_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<Vec<ForecastViewDay>> {
        if start > end {
            return Err(AppError::Validation("startDate must not be after endDate".into()));
        }

        let view_end = end + chrono::Duration::days(i64::from(self.forward_days));
        let days = dates::range_inclusive(start, view_end);

        let logs = self.store.list_daily_logs(user_id, start, view_end).await?;
        let forecasts = self.store.get_forecast_days(user_id, start, view_end).await?;

        let entries = days
            .into_iter()
            .map(|date| {
                if date <= today {
                    let score = logs
                        .iter()
                        .find(|l| l.date == date)
                        .and_then(|l| l.score);
                    ForecastViewDay {
                        date,
                        is_past: date < today,
                        is_today: date == today,
                        is_future: false,
                        emotion_score: score,
                        description: score
                            .map_or(NO_LOG_DESCRIPTION.to_string(), |s| bucket_label(s).to_string()),
                        trend: None,
                        confidence: None,
                        details: None,
                        recommendation: None,
                    }
                } else {
                    match forecasts.iter().find(|f| f.date == date) {
                        Some(f) => ForecastViewDay {
                            date,
                            is_past: false,
                            is_today: false,
                            is_future: true,
                            emotion_score: f.emotion_score,
                            description: f.description.clone(),
                            trend: f.trend,
                            confidence: Some(f.confidence),
                            details: Some(f.details.clone()),
                            recommendation: Some(f.recommendation.clone()),
                        },
                        None => ForecastViewDay {
                            date,
                            is_past: false,
                            is_today: false,
                            is_future: true,
                            emotion_score: None,
                            description: PLACEHOLDER_DESCRIPTION.to_string(),
                            trend: None,
                            confidence: None,
                            details: None,
                            recommendation: None,
                        },
                    }
                }
            })
            .collect();

        Ok(entries)
    }
}
