use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use soloist_api::config::Config;
use soloist_api::forecast::{ClaudeModel, ForecastModel, HeuristicModel, Reconciler};
use soloist_api::scoring::{RuleScorer, Scorer};
use soloist_api::store::{MemoryStore, PgStore, Store};
use soloist_api::{app, AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soloist_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env();
    let config = Arc::new(config);

    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(url) => {
            let pg = PgStore::connect(url)
                .await
                .expect("Failed to create database pool");

            sqlx::migrate!("./migrations")
                .run(pg.pool())
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, falling back to in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let model: Arc<dyn ForecastModel> = if config.claude_api_key.is_empty() {
        tracing::info!("No Claude API key configured, using heuristic forecast model");
        Arc::new(HeuristicModel::default())
    } else {
        Arc::new(
            ClaudeModel::new(config.claude_api_key.clone(), config.claude_model.clone())
                .expect("Failed to build Claude HTTP client"),
        )
    };

    let scorer: Arc<dyn Scorer> = Arc::new(RuleScorer);

    let reconciler = Reconciler::new(
        store.clone(),
        model,
        scorer,
        config.forecast_history_days,
        config.forecast_forward_days,
    );

    let state = AppState {
        store,
        reconciler,
        config: config.clone(),
    };

    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = vec![config
            .frontend_url
            .parse::<axum::http::HeaderValue>()
            .unwrap()];
        // In dev, also allow LAN access (e.g. testing from another device)
        if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
            for o in extra.split(',') {
                if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                    origins.push(hv);
                }
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let router = app(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, router).await.unwrap();
}
