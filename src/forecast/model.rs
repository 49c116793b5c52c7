use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::dates::day_str;
use crate::forecast::generator::{anchor_score, assemble, DayScore, GeneratedDay, HeuristicModel};

/// The forecast collaborator: maps historical scores to one generated
/// entry per requested target date, in target order. Implementations may
/// be local policies or remote model calls; failures are surfaced to the
/// reconciler, which persists nothing for that invocation.
#[async_trait]
pub trait ForecastModel: Send + Sync {
    async fn forecast(
        &self,
        past: &[DayScore],
        targets: &[NaiveDate],
    ) -> anyhow::Result<Vec<GeneratedDay>>;
}

/// Remote policy: asks the Anthropic API for per-day scores and derives
/// trend/confidence/narrative locally. Falls back to the heuristic policy
/// when the API is unreachable or returns a malformed answer.
pub struct ClaudeModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    fallback: HeuristicModel,
}

impl ClaudeModel {
    pub fn new(api_key: String, model: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            api_key,
            model,
            fallback: HeuristicModel::default(),
        })
    }

    async fn call_claude(
        &self,
        past: &[DayScore],
        targets: &[NaiveDate],
    ) -> anyhow::Result<Vec<i32>> {
        let history: Vec<String> = past
            .iter()
            .map(|p| format!("- {}: {}", day_str(p.date), p.score))
            .collect();
        let target_days: Vec<String> = targets.iter().copied().map(day_str).collect();

        let prompt = format!(
            r#"You forecast short-term wellbeing from daily 0-100 scores.

Recent scores:
{}

Predict a score for each of these days, in order: {}.

Respond with ONLY a JSON array of {} integers between 0 and 100."#,
            history.join("\n"),
            target_days.join(", "),
            targets.len(),
        );

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.model,
                "max_tokens": 256,
                "messages": [{
                    "role": "user",
                    "content": prompt
                }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Claude API error {}: {}", status, body);
        }

        let claude_response: serde_json::Value = response.json().await?;
        let text = claude_response["content"][0]["text"].as_str().unwrap_or("[]");

        let scores: Vec<i32> =
            serde_json::from_str(text).context("Claude response was not a JSON score array")?;
        if scores.len() != targets.len() {
            anyhow::bail!(
                "expected {} scores, got {}",
                targets.len(),
                scores.len()
            );
        }
        Ok(scores.into_iter().map(|s| s.clamp(0, 100)).collect())
    }
}

#[async_trait]
impl ForecastModel for ClaudeModel {
    async fn forecast(
        &self,
        past: &[DayScore],
        targets: &[NaiveDate],
    ) -> anyhow::Result<Vec<GeneratedDay>> {
        match self.call_claude(past, targets).await {
            Ok(scores) => Ok(assemble(anchor_score(past), targets, &scores)),
            Err(e) => {
                tracing::warn!(error = %e, "Claude API unavailable, using heuristic fallback");
                self.fallback.forecast(past, targets).await
            }
        }
    }
}
