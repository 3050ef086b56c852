/// Metadata Resolver
///
/// Matches free-text series titles against the catalog. A title with no
/// match becomes an Unresolved item that flows through the rest of the
/// pipeline; only transport failures remove an item from batch output.
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{ResolvedItem, SeriesAggregate},
    services::providers::{RequestPacer, TvCatalog},
};

pub struct Resolver {
    catalog: Arc<dyn TvCatalog>,
    pacer: RequestPacer,
}

/// Batch resolution output with the count of items lost to fetch failures
#[derive(Debug)]
pub struct ResolveOutcome {
    pub items: Vec<ResolvedItem>,
    pub skipped: usize,
}

impl Resolver {
    pub fn new(catalog: Arc<dyn TvCatalog>, pacer: RequestPacer) -> Self {
        Self { catalog, pacer }
    }

    /// Resolves one title: search, take the provider's best match, fetch
    /// its attribute record
    pub async fn resolve(&self, title: &str, watch_count: u32) -> AppResult<ResolvedItem> {
        let hits = self.catalog.search_tv(title).await?;

        let Some(best) = hits.first() else {
            tracing::info!(title = %title, "No catalog match");
            return Ok(ResolvedItem::unresolved(title.to_string(), watch_count));
        };

        let details = self.catalog.tv_details(best.id).await?;

        Ok(ResolvedItem::resolved(
            title.to_string(),
            watch_count,
            details.id,
            details.name.clone(),
            details.genre_names(),
            details.overview.clone(),
        ))
    }

    /// Resolves ranked aggregates in order, isolating per-item failures
    ///
    /// A transport failure logs a warning and drops that title; successes
    /// and no-matches keep their input positions relative to each other.
    pub async fn resolve_many(&self, aggregates: &[SeriesAggregate]) -> ResolveOutcome {
        let mut items = Vec::with_capacity(aggregates.len());
        let mut skipped = 0;

        for aggregate in aggregates {
            self.pacer.wait().await;

            match self
                .resolve(&aggregate.series_title, aggregate.watch_count)
                .await
            {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!(
                        title = %aggregate.series_title,
                        error = %e,
                        "Skipping title after fetch failure"
                    );
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            resolved = items.iter().filter(|i| i.is_resolved()).count(),
            unresolved = items.iter().filter(|i| !i.is_resolved()).count(),
            skipped = skipped,
            "Watched titles resolved"
        );

        ResolveOutcome { items, skipped }
    }

    /// Resolves manually entered titles; each counts as watched once
    pub async fn resolve_titles(&self, titles: &[String]) -> ResolveOutcome {
        let aggregates: Vec<SeriesAggregate> = titles
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| SeriesAggregate {
                series_title: t.to_string(),
                watch_count: 1,
                last_watched: None,
            })
            .collect();

        self.resolve_many(&aggregates).await
    }
}
