/// End-to-end recommendation pipeline
///
/// Stage order: normalize history → resolve watched titles → expand seeds
/// into a candidate pool → fit the taste profile → rank → optional
/// availability pass. Each stage consumes its predecessor's snapshot fully
/// before the next starts.
use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::AppResult,
    models::{RankedResult, ResolvedItem, WatchEvent},
    services::{
        availability::{filter_by_availability, WatchService},
        candidates::build_pool,
        history,
        profile,
        providers::{RequestPacer, TvCatalog},
        resolver::Resolver,
    },
};

/// Tunable pipeline parameters, one set per request
#[derive(Debug, Clone)]
pub struct PipelineParams {
    /// Watched series to summarize and resolve
    pub top_n: usize,
    /// Seeds taken from the head of the resolved set
    pub seed_n: usize,
    /// Similar titles taken per seed
    pub per_seed: usize,
    /// Final recommendation count
    pub top_k: usize,
    /// Region for the availability pass
    pub region: String,
    /// Availability pass toggle; `services` empty means any provider counts
    pub filter_availability: bool,
    pub services: Vec<WatchService>,
}

impl PipelineParams {
    pub const DEFAULT_SEED_N: usize = 10;
    pub const DEFAULT_PER_SEED: usize = 20;
}

/// Terminal pipeline output
///
/// `watched` is the resolved-watched table the caller may hand to a
/// persistence sink; per-item failures only show up as skip counts.
#[derive(Debug, Serialize)]
pub struct RecommendationReport {
    pub watched: Vec<ResolvedItem>,
    pub recommendations: Vec<RankedResult>,
    pub skipped_titles: usize,
    pub skipped_candidates: usize,
    pub skipped_availability: usize,
}

/// Runs the pipeline from raw viewing-history events
pub async fn recommend_from_events(
    catalog: Arc<dyn TvCatalog>,
    pacer: &RequestPacer,
    events: &[WatchEvent],
    params: &PipelineParams,
) -> AppResult<RecommendationReport> {
    let aggregates = history::summarize(events, params.top_n);

    tracing::info!(
        events = events.len(),
        series = aggregates.len(),
        "History summarized"
    );

    let resolver = Resolver::new(catalog.clone(), pacer.clone());
    let resolved = resolver.resolve_many(&aggregates).await;

    recommend_from_watched(catalog, pacer, resolved.items, resolved.skipped, params).await
}

/// Runs the pipeline from manually entered titles (watch count 1 each)
pub async fn recommend_from_titles(
    catalog: Arc<dyn TvCatalog>,
    pacer: &RequestPacer,
    titles: &[String],
    params: &PipelineParams,
) -> AppResult<RecommendationReport> {
    let resolver = Resolver::new(catalog.clone(), pacer.clone());
    let resolved = resolver.resolve_titles(titles).await;

    recommend_from_watched(catalog, pacer, resolved.items, resolved.skipped, params).await
}

async fn recommend_from_watched(
    catalog: Arc<dyn TvCatalog>,
    pacer: &RequestPacer,
    watched: Vec<ResolvedItem>,
    skipped_titles: usize,
    params: &PipelineParams,
) -> AppResult<RecommendationReport> {
    // Fails fast with InsufficientProfile before any expansion requests
    // when nothing resolved with usable text.
    let user_profile = profile::build_profile(&watched)?;

    let pool = build_pool(
        catalog.clone(),
        pacer,
        &watched,
        params.seed_n,
        params.per_seed,
    )
    .await;

    let excluded_ids: HashSet<u64> = watched.iter().filter_map(|item| item.tmdb_id).collect();

    let ranked = profile::rank(&user_profile, &pool.candidates, &excluded_ids, params.top_k);

    tracing::info!(
        candidates = pool.candidates.len(),
        ranked = ranked.len(),
        "Candidates ranked"
    );

    let (recommendations, skipped_availability) = if params.filter_availability {
        let outcome = filter_by_availability(
            catalog,
            pacer,
            ranked,
            &params.region,
            &params.services,
        )
        .await;
        (outcome.results, outcome.skipped)
    } else {
        (ranked, 0)
    };

    Ok(RecommendationReport {
        watched,
        recommendations,
        skipped_titles,
        skipped_candidates: pool.skipped,
        skipped_availability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TvDetails, TvGenre, TvSearchHit};
    use crate::services::providers::MockTvCatalog;

    fn hit(id: u64) -> TvSearchHit {
        TvSearchHit {
            id,
            name: None,
            overview: None,
            first_air_date: None,
        }
    }

    fn details(id: u64, name: &str, genre: &str, overview: &str) -> TvDetails {
        TvDetails {
            id,
            name: Some(name.to_string()),
            genres: vec![TvGenre {
                name: Some(genre.to_string()),
            }],
            overview: Some(overview.to_string()),
        }
    }

    fn params() -> PipelineParams {
        PipelineParams {
            top_n: history::DEFAULT_TOP_N,
            seed_n: PipelineParams::DEFAULT_SEED_N,
            per_seed: PipelineParams::DEFAULT_PER_SEED,
            top_k: profile::DEFAULT_TOP_K,
            region: "ZA".to_string(),
            filter_availability: false,
            services: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_recommendations_never_include_watched_ids() {
        let mut catalog = MockTvCatalog::new();
        catalog.expect_search_tv().returning(|query| match query {
            "Crime Show" => Ok(vec![hit(1)]),
            _ => Ok(vec![]),
        });
        catalog.expect_tv_details().returning(|id| match id {
            1 => Ok(details(1, "Crime Show", "Crime", "Heists and detectives.")),
            _ => Ok(details(id, "Candidate", "Crime", "More heists.")),
        });
        // The similar listing leaks the watched id back; ranking must drop it
        catalog
            .expect_similar_tv()
            .returning(|_| Ok(vec![hit(1), hit(2), hit(3)]));

        let events = vec![WatchEvent {
            raw_title: "Crime Show: Season 1: Pilot".to_string(),
            watched_at: None,
        }];

        let report = recommend_from_events(
            Arc::new(catalog),
            &RequestPacer::unthrottled(),
            &events,
            &params(),
        )
        .await
        .unwrap();

        assert!(report.recommendations.iter().all(|r| r.tmdb_id != 1));
        assert_eq!(report.watched.len(), 1);
        assert!(!report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_history_is_insufficient_profile() {
        let mut catalog = MockTvCatalog::new();
        catalog.expect_search_tv().returning(|_| Ok(vec![]));

        let events = vec![WatchEvent {
            raw_title: "ZZZNoSuchShow123".to_string(),
            watched_at: None,
        }];

        let result = recommend_from_events(
            Arc::new(catalog),
            &RequestPacer::unthrottled(),
            &events,
            &params(),
        )
        .await;

        assert!(matches!(
            result,
            Err(crate::error::AppError::InsufficientProfile)
        ));
    }

    #[tokio::test]
    async fn test_manual_titles_flow() {
        let mut catalog = MockTvCatalog::new();
        catalog
            .expect_search_tv()
            .returning(|_| Ok(vec![hit(1)]));
        catalog.expect_tv_details().returning(|id| match id {
            1 => Ok(details(1, "Dark", "Sci-Fi", "Time travel in a small town.")),
            _ => Ok(details(id, "Candidate", "Sci-Fi", "Time loops.")),
        });
        catalog
            .expect_similar_tv()
            .returning(|_| Ok(vec![hit(8), hit(9)]));

        let report = recommend_from_titles(
            Arc::new(catalog),
            &RequestPacer::unthrottled(),
            &["Dark".to_string()],
            &params(),
        )
        .await
        .unwrap();

        assert_eq!(report.watched[0].watch_count, 1);
        assert_eq!(report.recommendations.len(), 2);
    }
}
