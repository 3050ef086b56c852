use std::time::Duration;

/// TV catalog provider abstraction
///
/// This module isolates the pipeline from the concrete metadata provider.
/// The pipeline stages only see ranked search hits, per-title details, the
/// "similar titles" relation, and per-region watch providers.
use crate::{
    error::AppResult,
    models::{TvDetails, TvSearchHit, WatchProviderResponse},
};

pub mod tmdb;

/// Trait for TV metadata providers
///
/// All four operations are request/response and authenticated by an opaque
/// credential the pipeline never inspects. Result ordering is the provider's
/// own relevance ordering.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TvCatalog: Send + Sync {
    /// Search for TV series by free-text title
    ///
    /// An empty result list means the title has no catalog match; callers
    /// treat that as an unresolved item, not an error.
    async fn search_tv(&self, query: &str) -> AppResult<Vec<TvSearchHit>>;

    /// Fetch the full attribute record for one series
    async fn tv_details(&self, tv_id: u64) -> AppResult<TvDetails>;

    /// Fetch series ranked as similar to the given one
    ///
    /// The provider never includes the queried series in its own results.
    async fn similar_tv(&self, tv_id: u64) -> AppResult<Vec<TvSearchHit>>;

    /// Fetch per-region streaming provider listings for one series
    async fn watch_providers(&self, tv_id: u64) -> AppResult<WatchProviderResponse>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Fixed-delay pacing between sequential external calls
///
/// Third-party politeness rather than correctness: the pipeline stages call
/// `wait` before each catalog request so batch expansion never bursts. The
/// `TvCatalog` seam would equally admit a bounded worker pool; sequential
/// pacing keeps output order trivially stable.
#[derive(Debug, Clone)]
pub struct RequestPacer {
    delay: Duration,
}

impl RequestPacer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// A pacer that never sleeps, for tests and stubbed providers
    pub fn unthrottled() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
