use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;

use crate::forecast::model::ForecastModel;
use crate::models::forecast::Trend;

/// One historical point feeding a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayScore {
    pub date: NaiveDate,
    pub score: i32,
}

/// Model output for one future day, before persistence wraps it into a
/// full record.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDay {
    pub date: NaiveDate,
    pub emotion_score: i32,
    pub description: String,
    pub trend: Trend,
    pub details: String,
    pub recommendation: String,
    pub confidence: i32,
}

/// Anchor used when no history exists at all.
pub const NEUTRAL_ANCHOR: i32 = 50;
/// Score movement within this margin of the anchor counts as stable.
pub const TREND_MARGIN: i32 = 5;
pub const CONFIDENCE_START: i32 = 90;
pub const CONFIDENCE_STEP: i32 = 10;
pub const CONFIDENCE_FLOOR: i32 = 20;

/// Most recent known score, or the neutral anchor with no history.
pub fn anchor_score(past: &[DayScore]) -> i32 {
    past.iter().max_by_key(|p| p.date).map_or(NEUTRAL_ANCHOR, |p| p.score)
}

pub fn classify_trend(score: i32, anchor: i32) -> Trend {
    if score > anchor + TREND_MARGIN {
        Trend::Up
    } else if score < anchor - TREND_MARGIN {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Confidence for the i-th forecast day: decays with distance from the
/// last known real day, floored so it never goes negative.
pub fn confidence_at(index: usize) -> i32 {
    (CONFIDENCE_START - CONFIDENCE_STEP * index as i32).max(CONFIDENCE_FLOOR)
}

// Ten contiguous 10-point score buckets, worst to best.
const BUCKET_LABELS: [&str; 10] = [
    "Extremely Difficult",
    "Very Difficult",
    "Difficult",
    "Challenging",
    "Below Average",
    "Balanced",
    "Pleasant",
    "Good Day",
    "Great Day",
    "Exceptional Day",
];

const BUCKET_DETAILS: [&str; 10] = [
    "A very hard stretch is likely, with energy and mood under heavy strain.",
    "Expect a rough day where most things feel like an uphill push.",
    "A low day is likely, with motivation harder to find than usual.",
    "Some friction is expected; small wins will matter more than big plans.",
    "A slightly flat day, functional but without much spark.",
    "An even-keeled day, neither draining nor energizing.",
    "A comfortable day with room for things to go your way.",
    "A solid day with good energy and a positive baseline.",
    "A strong day where momentum should come easily.",
    "An outstanding day, with mood and energy at their peak.",
];

const BUCKET_RECOMMENDATIONS: [&str; 10] = [
    "Keep the schedule minimal and lean on your support network.",
    "Protect rest and postpone anything optional or demanding.",
    "Plan one small, achievable task and count it as enough.",
    "Build in breaks and avoid stacking difficult commitments.",
    "A short walk or change of scenery can lift the baseline.",
    "Stick to your routines; consistency will carry the day.",
    "Schedule something you enjoy to reinforce the upswing.",
    "Good day to tackle a task you have been putting off.",
    "Use the momentum for meaningful work or time with people.",
    "Make the most of it: plan something memorable.",
];

fn bucket_index(score: i32) -> usize {
    (score.clamp(0, 100) / 10).min(9) as usize
}

/// Human label for a score bucket.
pub fn bucket_label(score: i32) -> &'static str {
    BUCKET_LABELS[bucket_index(score)]
}

fn trend_phrase(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "Trending upward from your recent days.",
        Trend::Down => "Trending downward from your recent days.",
        Trend::Stable => "Holding steady relative to your recent days.",
    }
}

/// Turn raw per-day scores into full forecast entries. Narrative fields
/// are a pure function of score bucket and trend.
pub fn assemble(anchor: i32, targets: &[NaiveDate], scores: &[i32]) -> Vec<GeneratedDay> {
    targets
        .iter()
        .zip(scores)
        .enumerate()
        .map(|(i, (&date, &raw))| {
            let score = raw.clamp(0, 100);
            let trend = classify_trend(score, anchor);
            GeneratedDay {
                date,
                emotion_score: score,
                description: bucket_label(score).to_string(),
                trend,
                details: format!("{} {}", BUCKET_DETAILS[bucket_index(score)], trend_phrase(trend)),
                recommendation: BUCKET_RECOMMENDATIONS[bucket_index(score)].to_string(),
                confidence: confidence_at(i),
            }
        })
        .collect()
}

/// The default forecast policy: bounded random deltas around the anchor,
/// scaled with distance so uncertainty grows day by day.
#[derive(Debug, Clone)]
pub struct HeuristicModel {
    pub max_step_delta: i32,
}

impl Default for HeuristicModel {
    fn default() -> Self {
        Self { max_step_delta: 4 }
    }
}

#[async_trait]
impl ForecastModel for HeuristicModel {
    async fn forecast(
        &self,
        past: &[DayScore],
        targets: &[NaiveDate],
    ) -> anyhow::Result<Vec<GeneratedDay>> {
        let anchor = anchor_score(past);
        let scores: Vec<i32> = {
            let mut rng = rand::thread_rng();
            targets
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    let step = i as i32 + 1;
                    let delta = rng.gen_range(-self.max_step_delta..=self.max_step_delta) * step;
                    (anchor + delta).clamp(0, 100)
                })
                .collect()
        };
        Ok(assemble(anchor, targets, &scores))
    }
}
