use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// A user's answers for one day. All fields optional: a partial submission
/// is still a valid log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyAnswers {
    /// 1-10 ratings.
    pub overall_mood: Option<i32>,
    pub work_satisfaction: Option<i32>,
    pub life_satisfaction: Option<i32>,
    pub work_life_balance: Option<i32>,
    pub sleep_hours: Option<f64>,
    pub exercised: Option<bool>,
    pub reflections: Option<String>,
}

const RATING_FIELDS: [&str; 4] = [
    "overallMood",
    "workSatisfaction",
    "lifeSatisfaction",
    "workLifeBalance",
];

impl DailyAnswers {
    fn ratings(&self) -> [Option<i32>; 4] {
        [
            self.overall_mood,
            self.work_satisfaction,
            self.life_satisfaction,
            self.work_life_balance,
        ]
    }

    /// Boundary validation for submitted answers: ratings must sit on the
    /// 1-10 scale and sleep hours must be physically possible.
    pub fn validate(&self) -> Result<(), String> {
        for (value, name) in self.ratings().iter().zip(RATING_FIELDS) {
            if let Some(v) = value {
                if !(1..=10).contains(v) {
                    return Err(format!("{name} must be between 1 and 10"));
                }
            }
        }
        if let Some(h) = self.sleep_hours {
            if !(0.0..=24.0).contains(&h) {
                return Err("sleepHours must be between 0 and 24".into());
            }
        }
        Ok(())
    }
}

// Rating weights: overall mood dominates, the three satisfaction axes
// split the rest evenly.
const WEIGHTS: [f64; 4] = [0.4, 0.2, 0.2, 0.2];
const NEUTRAL_RATING: f64 = 5.5;

/// Map one day's answers to a 0-100 wellbeing score.
///
/// Weighted blend of the four 1-10 ratings mapped linearly onto 0-100
/// (missing ratings count as the 5.5 midpoint), then a +/-5 sleep
/// adjustment and a +3 exercise bonus, clamped. Linear in every rating, so
/// raising any single rating can never lower the score.
pub fn compute_score(answers: &DailyAnswers) -> i32 {
    let mut blended = 0.0;
    for (value, weight) in answers.ratings().iter().zip(WEIGHTS) {
        let rating = value.map(|v| f64::from(v).clamp(1.0, 10.0)).unwrap_or(NEUTRAL_RATING);
        blended += weight * (rating - 1.0) / 9.0 * 100.0;
    }

    let sleep_adj = match answers.sleep_hours {
        Some(h) if (7.0..=9.0).contains(&h) => 5.0,
        Some(h) if h < 5.0 => -5.0,
        _ => 0.0,
    };
    let exercise_adj = if answers.exercised == Some(true) { 3.0 } else { 0.0 };

    (blended + sleep_adj + exercise_adj).round().clamp(0.0, 100.0) as i32
}

/// The scoring collaborator. `RuleScorer` is the in-process engine; a
/// remote implementation may fail, in which case the daily-log upsert
/// persists the answers with no score rather than blocking the write.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, answers: &DailyAnswers) -> AppResult<i32>;
}

#[derive(Debug, Clone, Default)]
pub struct RuleScorer;

#[async_trait]
impl Scorer for RuleScorer {
    async fn score(&self, answers: &DailyAnswers) -> AppResult<i32> {
        Ok(compute_score(answers))
    }
}
