use std::collections::HashMap;
use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use nextwatch_api::api::{create_router, AppState};
use nextwatch_api::config::Config;
use nextwatch_api::error::AppResult;
use nextwatch_api::models::{
    ProviderEntry, RegionProviders, TvDetails, TvGenre, TvSearchHit, WatchProviderResponse,
};
use nextwatch_api::services::providers::TvCatalog;

/// In-memory catalog with a fixed watched show and two similar candidates
struct StubCatalog;

fn hit(id: u64, name: &str) -> TvSearchHit {
    TvSearchHit {
        id,
        name: Some(name.to_string()),
        overview: None,
        first_air_date: None,
    }
}

#[async_trait::async_trait]
impl TvCatalog for StubCatalog {
    async fn search_tv(&self, query: &str) -> AppResult<Vec<TvSearchHit>> {
        match query {
            "Crime Show" => Ok(vec![hit(1, "Crime Show")]),
            _ => Ok(vec![]),
        }
    }

    async fn tv_details(&self, tv_id: u64) -> AppResult<TvDetails> {
        let (name, overview) = match tv_id {
            1 => ("Crime Show", "Heists and detectives in the city."),
            2 => ("Heist Drama", "Detectives chase a heist crew."),
            _ => ("Another Heist", "Detectives again, more heists."),
        };

        Ok(TvDetails {
            id: tv_id,
            name: Some(name.to_string()),
            genres: vec![TvGenre {
                name: Some("Crime".to_string()),
            }],
            overview: Some(overview.to_string()),
        })
    }

    async fn similar_tv(&self, _tv_id: u64) -> AppResult<Vec<TvSearchHit>> {
        Ok(vec![hit(2, "Heist Drama"), hit(3, "Another Heist")])
    }

    async fn watch_providers(&self, tv_id: u64) -> AppResult<WatchProviderResponse> {
        let mut results = HashMap::new();
        if tv_id == 2 {
            results.insert(
                "ZA".to_string(),
                RegionProviders {
                    flatrate: vec![ProviderEntry {
                        provider_name: "Netflix".to_string(),
                    }],
                },
            );
        }
        Ok(WatchProviderResponse { results })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn create_test_server() -> TestServer {
    let config = Config {
        tmdb_api_key: "test_key".to_string(),
        tmdb_api_url: "http://test.local".to_string(),
        region: "ZA".to_string(),
        request_delay_ms: 0,
        host: "127.0.0.1".to_string(),
        port: 0,
    };

    let state = AppState::new(Arc::new(StubCatalog), &config);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

const HISTORY_CSV: &str = "Title,Date\n\
Crime Show: Season 1: Pilot,3/1/24\n\
Crime Show: Season 1: Two,3/2/24\n\
ZZZNoSuchShow123,3/3/24\n";

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_history_summary_orders_by_watch_count() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/history/summary")
        .json(&json!({ "history_csv": HISTORY_CSV }))
        .await;

    response.assert_status_ok();
    let summary: Vec<serde_json::Value> = response.json();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0]["series_title"], "Crime Show");
    assert_eq!(summary[0]["watch_count"], 2);
    assert_eq!(summary[1]["series_title"], "ZZZNoSuchShow123");
}

#[tokio::test]
async fn test_recommendations_from_history() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "history_csv": HISTORY_CSV }))
        .await;

    response.assert_status_ok();
    let report: serde_json::Value = response.json();

    // Both history rows survive resolution; the unknown one is unresolved
    let watched = report["watched"].as_array().unwrap();
    assert_eq!(watched.len(), 2);
    assert_eq!(watched[0]["status"], "resolved");
    assert_eq!(watched[1]["status"], "unresolved");

    // Candidates exclude the watched id
    let recommendations = report["recommendations"].as_array().unwrap();
    assert!(!recommendations.is_empty());
    assert!(recommendations.iter().all(|r| r["tmdb_id"] != 1));
}

#[tokio::test]
async fn test_recommendations_from_manual_titles() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "titles": ["Crime Show"] }))
        .await;

    response.assert_status_ok();
    let report: serde_json::Value = response.json();
    assert_eq!(report["watched"][0]["watch_count"], 1);
    assert!(!report["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_with_availability_filter() {
    let server = create_test_server();

    // Only candidate 2 streams on Netflix in ZA in the stub
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "history_csv": HISTORY_CSV,
            "services": ["netflix"]
        }))
        .await;

    response.assert_status_ok();
    let report: serde_json::Value = response.json();
    let recommendations = report["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0]["tmdb_id"], 2);
    assert_eq!(recommendations[0]["available_on"][0], "Netflix");
}

#[tokio::test]
async fn test_unresolvable_history_is_unprocessable() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "history_csv": "Title\nZZZNoSuchShow123\n" }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("No watched items resolved"));
}

#[tokio::test]
async fn test_request_must_pick_one_source() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "history_csv": HISTORY_CSV,
            "titles": ["Crime Show"]
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let response = server.post("/api/v1/recommendations").json(&json!({})).await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}
