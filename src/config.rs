use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub claude_api_key: String,
    pub claude_model: String,

    /// How many future days a forecast covers.
    pub forecast_forward_days: u32,
    /// How many trailing days (ending today) must all be logged before a
    /// forecast is generated.
    pub forecast_history_days: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            claude_api_key: env::var("CLAUDE_API_KEY").unwrap_or_else(|_| String::new()),
            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".into()),

            forecast_forward_days: env::var("FORECAST_FORWARD_DAYS")
                .unwrap_or_else(|_| "3".into())
                .parse()
                .expect("FORECAST_FORWARD_DAYS must be a number"),
            forecast_history_days: env::var("FORECAST_HISTORY_DAYS")
                .unwrap_or_else(|_| "4".into())
                .parse()
                .expect("FORECAST_HISTORY_DAYS must be a number"),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
