pub mod generator;
pub mod model;
pub mod reconciler;

pub use generator::{DayScore, GeneratedDay, HeuristicModel};
pub use model::{ClaudeModel, ForecastModel};
pub use reconciler::{ForecastOutcome, Reconciler};
