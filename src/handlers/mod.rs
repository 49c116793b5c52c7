pub mod daily_logs;
pub mod forecast;
pub mod health;
