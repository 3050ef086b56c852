/// Availability Filter
///
/// Optional post-ranking pass: annotates ranked results with the streaming
/// services they are available on in a region, and drops anything not
/// watchable on the requested services. Rank order among survivors is
/// preserved; an empty final result is a valid outcome.
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    models::RankedResult,
    services::providers::{RequestPacer, TvCatalog},
};

/// Streaming services the filter knows how to match by name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WatchService {
    Netflix,
    PrimeVideo,
}

impl WatchService {
    /// Case-insensitive match against a provider display name
    ///
    /// TMDB labels Prime Video inconsistently across regions, hence the
    /// alias list.
    pub fn matches(&self, provider_name: &str) -> bool {
        let name = provider_name.to_lowercase();
        match self {
            WatchService::Netflix => name == "netflix",
            WatchService::PrimeVideo => {
                name == "amazon prime video" || name == "prime video"
            }
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WatchService::Netflix => "Netflix",
            WatchService::PrimeVideo => "Prime Video",
        }
    }
}

/// Filter output with the count of items lost to fetch failures
#[derive(Debug)]
pub struct AvailabilityOutcome {
    pub results: Vec<RankedResult>,
    pub skipped: usize,
}

/// Filters ranked results by streaming availability in `region`
///
/// With `allowed` services given, an item survives iff at least one of its
/// region providers matches an allowed service, and `available_on` lists
/// the matched service names. With `allowed` empty the caller selected no
/// specific service: every named provider counts, so the pass reduces to
/// availability-existence and annotates all provider names.
pub async fn filter_by_availability(
    catalog: Arc<dyn TvCatalog>,
    pacer: &RequestPacer,
    ranked: Vec<RankedResult>,
    region: &str,
    allowed: &[WatchService],
) -> AvailabilityOutcome {
    let mut results = Vec::with_capacity(ranked.len());
    let mut skipped = 0;

    for mut item in ranked {
        pacer.wait().await;

        let providers = match catalog.watch_providers(item.tmdb_id).await {
            Ok(response) => response.provider_names(region),
            Err(e) => {
                tracing::warn!(
                    tmdb_id = item.tmdb_id,
                    error = %e,
                    "Dropping result after availability fetch failure"
                );
                skipped += 1;
                continue;
            }
        };

        let available_on: Vec<String> = if allowed.is_empty() {
            providers
        } else {
            allowed
                .iter()
                .filter(|service| providers.iter().any(|p| service.matches(p)))
                .map(|service| service.display_name().to_string())
                .collect()
        };

        if available_on.is_empty() {
            tracing::debug!(
                tmdb_id = item.tmdb_id,
                region = %region,
                "Result not available on requested services"
            );
            continue;
        }

        item.available_on = Some(available_on);
        results.push(item);
    }

    tracing::info!(
        kept = results.len(),
        skipped = skipped,
        region = %region,
        "Availability filter applied"
    );

    AvailabilityOutcome { results, skipped }
}
