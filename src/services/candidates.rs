/// Candidate Pool Builder
///
/// Expands resolved watched items into a deduplicated pool of unwatched
/// candidates via the catalog's "similar titles" relation. Pure expansion:
/// excluding the watched set happens at ranking time, not here.
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    models::{CandidateItem, ResolvedItem},
    services::providers::{RequestPacer, TvCatalog},
};

/// Pool construction output with the count of candidates lost to failures
#[derive(Debug)]
pub struct PoolOutcome {
    pub candidates: Vec<CandidateItem>,
    pub skipped: usize,
}

/// Builds the candidate pool from the top `seed_n` resolved items
///
/// Candidate identity is the TMDB id alone; a BTreeSet dedups across seeds
/// and fixes detail-fetch order to ascending id for reproducible output.
/// Failures fetching one seed's neighbors or one candidate's details are
/// isolated and only shrink the pool.
pub async fn build_pool(
    catalog: Arc<dyn TvCatalog>,
    pacer: &RequestPacer,
    seeds: &[ResolvedItem],
    seed_n: usize,
    per_seed: usize,
) -> PoolOutcome {
    let seed_ids: Vec<u64> = seeds
        .iter()
        .filter(|item| item.is_resolved())
        .take(seed_n)
        .filter_map(|item| item.tmdb_id)
        .collect();

    let mut candidate_ids: BTreeSet<u64> = BTreeSet::new();
    let mut skipped = 0;

    for seed_id in &seed_ids {
        pacer.wait().await;

        match catalog.similar_tv(*seed_id).await {
            Ok(hits) => {
                candidate_ids.extend(hits.iter().take(per_seed).map(|h| h.id));
            }
            Err(e) => {
                tracing::warn!(seed_id = seed_id, error = %e, "Skipping seed expansion");
            }
        }
    }

    tracing::info!(
        seeds = seed_ids.len(),
        unique_candidates = candidate_ids.len(),
        "Candidate ids collected"
    );

    let mut candidates = Vec::with_capacity(candidate_ids.len());
    for candidate_id in candidate_ids {
        pacer.wait().await;

        match catalog.tv_details(candidate_id).await {
            Ok(details) => candidates.push(CandidateItem {
                tmdb_id: details.id,
                name: details.name.clone(),
                genres: details.genre_names(),
                overview: details.overview.clone(),
            }),
            Err(e) => {
                tracing::warn!(
                    candidate_id = candidate_id,
                    error = %e,
                    "Dropping candidate after fetch failure"
                );
                skipped += 1;
            }
        }
    }

    tracing::info!(
        candidates = candidates.len(),
        skipped = skipped,
        "Candidate pool built"
    );

    PoolOutcome {
        candidates,
        skipped,
    }
}
