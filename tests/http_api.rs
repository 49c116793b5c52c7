use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use soloist_api::config::Config;
use soloist_api::forecast::{ForecastModel, HeuristicModel, Reconciler};
use soloist_api::scoring::{RuleScorer, Scorer};
use soloist_api::store::{MemoryStore, Store};
use soloist_api::{app, AppState};

fn test_config() -> Config {
    Config {
        database_url: None,
        host: "127.0.0.1".into(),
        port: 0,
        frontend_url: "http://localhost:3000".into(),
        claude_api_key: String::new(),
        claude_model: String::new(),
        forecast_forward_days: 3,
        forecast_history_days: 4,
    }
}

fn test_app() -> axum::Router {
    let config = Arc::new(test_config());
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let model: Arc<dyn ForecastModel> = Arc::new(HeuristicModel::default());
    let scorer: Arc<dyn Scorer> = Arc::new(RuleScorer);
    let reconciler = Reconciler::new(
        store.clone(),
        model,
        scorer,
        config.forecast_history_days,
        config.forecast_forward_days,
    );
    app(AppState {
        store,
        reconciler,
        config,
    })
}

async fn send(router: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let router = test_app();
    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "soloist-api");
}

#[tokio::test]
async fn readyz_reports_ready_on_memory_store() {
    let router = test_app();
    let (status, body) = send(&router, get("/readyz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["store"], "ok");
}

#[tokio::test]
async fn upsert_then_get_roundtrip() {
    let router = test_app();
    let user_id = Uuid::new_v4();

    let (status, body) = send(
        &router,
        post_json(
            &format!("/api/users/{user_id}/daily-logs"),
            json!({
                "date": "2025-06-10",
                "answers": {
                    "overallMood": 8,
                    "workSatisfaction": 7,
                    "lifeSatisfaction": 7,
                    "workLifeBalance": 6,
                    "sleepHours": 8.0,
                    "exercised": true
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2025-06-10");
    assert_eq!(body["userId"], user_id.to_string());
    let score = body["score"].as_i64().expect("score computed on upsert");
    assert!((0..=100).contains(&score));
    assert!(body["createdAt"].is_string());
    assert_eq!(body["answers"]["overallMood"], 8);

    let (status, fetched) = send(
        &router,
        get(&format!("/api/users/{user_id}/daily-logs/2025-06-10")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["score"], body["score"]);
}

#[tokio::test]
async fn second_upsert_wins_and_keeps_one_row() {
    let router = test_app();
    let user_id = Uuid::new_v4();
    let uri = format!("/api/users/{user_id}/daily-logs");

    let (_, first) = send(
        &router,
        post_json(&uri, json!({ "date": "2025-06-10", "answers": { "overallMood": 2 } })),
    )
    .await;
    let (_, second) = send(
        &router,
        post_json(&uri, json!({ "date": "2025-06-10", "answers": { "overallMood": 9 } })),
    )
    .await;
    assert_eq!(first["id"], second["id"]);
    assert_eq!(first["createdAt"], second["createdAt"]);
    assert!(second["score"].as_i64() > first["score"].as_i64());

    let (_, listed) = send(
        &router,
        get(&format!("{uri}?startDate=2025-06-10&endDate=2025-06-10")),
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_by_year_returns_only_that_year() {
    let router = test_app();
    let user_id = Uuid::new_v4();
    let uri = format!("/api/users/{user_id}/daily-logs");

    for date in ["2024-12-31", "2025-01-01", "2025-07-15"] {
        send(
            &router,
            post_json(&uri, json!({ "date": date, "answers": { "overallMood": 5 } })),
        )
        .await;
    }

    let (status, listed) = send(&router, get(&format!("{uri}?year=2025"))).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-01-01", "2025-07-15"]);
}

#[tokio::test]
async fn malformed_date_is_rejected_before_persistence() {
    let router = test_app();
    let user_id = Uuid::new_v4();
    let uri = format!("/api/users/{user_id}/daily-logs");

    for bad in ["2025-6-10", "06-10-2025", "not-a-date"] {
        let (status, body) = send(
            &router,
            post_json(&uri, json!({ "date": bad, "answers": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{bad} accepted");
        assert!(body["error"]["message"].is_string());
    }

    let (status, _) = send(
        &router,
        get(&format!("/api/users/{user_id}/daily-logs/2025-6-10")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn out_of_scale_rating_is_rejected() {
    let router = test_app();
    let user_id = Uuid::new_v4();

    let (status, _) = send(
        &router,
        post_json(
            &format!("/api/users/{user_id}/daily-logs"),
            json!({ "date": "2025-06-10", "answers": { "overallMood": 15 } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_log_is_a_404() {
    let router = test_app();
    let user_id = Uuid::new_v4();
    let (status, _) = send(
        &router,
        get(&format!("/api/users/{user_id}/daily-logs/2025-06-10")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forecast_view_shows_placeholders_until_history_fills() {
    let router = test_app();
    let user_id = Uuid::new_v4();

    let (status, body) = send(&router, get(&format!("/api/users/{user_id}/forecast"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "missingHistory");

    let days = body["days"].as_array().unwrap();
    // 4-day trailing span plus 3 forward days.
    assert_eq!(days.len(), 7);
    let future: Vec<&Value> = days.iter().filter(|d| d["isFuture"] == true).collect();
    assert_eq!(future.len(), 3);
    for day in future {
        assert_eq!(day["description"], "Forecast Needed");
        assert!(day["emotionScore"].is_null());
    }
}

#[tokio::test]
async fn filling_the_window_enables_generation() {
    let router = test_app();
    let user_id = Uuid::new_v4();
    let uri = format!("/api/users/{user_id}/daily-logs");

    let today = Utc::now().date_naive();
    for offset in 0..4 {
        let date = today - chrono::Duration::days(offset);
        send(
            &router,
            post_json(
                &uri,
                json!({
                    "date": date.format("%Y-%m-%d").to_string(),
                    "answers": { "overallMood": 7, "sleepHours": 8.0 }
                }),
            ),
        )
        .await;
    }

    let (status, body) = send(
        &router,
        post_json(&format!("/api/users/{user_id}/forecast/generate"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "generated");
    assert_eq!(body["outcome"]["days"], 3);

    let days = body["days"].as_array().unwrap();
    let future: Vec<&Value> = days.iter().filter(|d| d["isFuture"] == true).collect();
    assert_eq!(future.len(), 3);
    for day in &future {
        assert!(day["emotionScore"].is_i64() || day["emotionScore"].is_u64());
        assert!(day["confidence"].is_i64() || day["confidence"].is_u64());
        assert!(day["trend"].is_string());
        assert!(day["details"].is_string());
        assert!(day["recommendation"].is_string());
    }

    // A second automatic read leaves the generated set untouched.
    let (status, view) = send(&router, get(&format!("/api/users/{user_id}/forecast"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["outcome"]["status"], "alreadyFresh");
}
