use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::SeriesAggregate,
    services::{
        availability::WatchService,
        history,
        pipeline::{self, PipelineParams, RecommendationReport},
        profile,
    },
};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct HistorySummaryRequest {
    /// Raw CSV text of the viewing-history export
    pub history_csv: String,
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Raw CSV text of the viewing-history export
    pub history_csv: Option<String>,
    /// Manually entered watched titles, an alternative to the CSV
    pub titles: Option<Vec<String>>,
    pub top_n: Option<usize>,
    pub seed_n: Option<usize>,
    pub per_seed: Option<usize>,
    pub top_k: Option<usize>,
    /// Region override for the availability pass
    pub region: Option<String>,
    /// Requested services; present (even empty) enables the availability
    /// pass, empty means any provider counts
    pub services: Option<Vec<WatchService>>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Summarizes a viewing-history CSV into ranked series aggregates
pub async fn history_summary(
    Json(request): Json<HistorySummaryRequest>,
) -> AppResult<Json<Vec<SeriesAggregate>>> {
    let events = history::load_history(request.history_csv.as_bytes())?;
    let summary = history::summarize(&events, request.top_n.unwrap_or(history::DEFAULT_TOP_N));
    Ok(Json(summary))
}

/// Runs the full recommendation pipeline for one viewing-history snapshot
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationReport>> {
    let AppState {
        catalog,
        pacer,
        default_region,
    } = state;

    let params = PipelineParams {
        top_n: request.top_n.unwrap_or(history::DEFAULT_TOP_N),
        seed_n: request.seed_n.unwrap_or(PipelineParams::DEFAULT_SEED_N),
        per_seed: request.per_seed.unwrap_or(PipelineParams::DEFAULT_PER_SEED),
        top_k: request.top_k.unwrap_or(profile::DEFAULT_TOP_K),
        region: request.region.unwrap_or(default_region),
        filter_availability: request.services.is_some(),
        services: request.services.unwrap_or_default(),
    };

    let report = match (request.history_csv, request.titles) {
        (Some(csv_text), None) => {
            let events = history::load_history(csv_text.as_bytes())?;
            pipeline::recommend_from_events(catalog, &pacer, &events, &params).await?
        }
        (None, Some(titles)) => {
            pipeline::recommend_from_titles(catalog, &pacer, &titles, &params).await?
        }
        _ => {
            return Err(AppError::InvalidInput(
                "Provide exactly one of history_csv or titles".to_string(),
            ))
        }
    };

    Ok(Json(report))
}
