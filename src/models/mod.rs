use std::collections::HashMap;

use serde::Deserialize;

mod catalog;
mod history;

pub use catalog::{CandidateItem, RankedResult, ResolveStatus, ResolvedItem};
pub use history::{SeriesAggregate, WatchEvent};

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /search/tv and GET /tv/{id}/similar
#[derive(Debug, Clone, Deserialize)]
pub struct TvListResponse {
    #[serde(default)]
    pub results: Vec<TvSearchHit>,
}

/// One ranked entry in a TMDB TV listing
///
/// Listings are ordered by TMDB's own relevance; no local re-ranking is done.
#[derive(Debug, Clone, Deserialize)]
pub struct TvSearchHit {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

/// Response from GET /tv/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TvDetails {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genres: Vec<TvGenre>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvGenre {
    #[serde(default)]
    pub name: Option<String>,
}

impl TvDetails {
    /// Genre display names in TMDB's order, entries without a name skipped
    pub fn genre_names(&self) -> Vec<String> {
        self.genres
            .iter()
            .filter_map(|g| g.name.clone())
            .collect()
    }
}

/// Response from GET /tv/{id}/watch/providers
///
/// `results` maps region codes ("US", "ZA", ...) to per-region listings.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchProviderResponse {
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}

/// Per-region provider listing
#[derive(Debug, Clone, Deserialize)]
pub struct RegionProviders {
    #[serde(default)]
    pub flatrate: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEntry {
    pub provider_name: String,
}

impl WatchProviderResponse {
    /// Subscription provider names for one region, in TMDB's order
    pub fn provider_names(&self, region: &str) -> Vec<String> {
        self.results
            .get(region)
            .map(|r| r.flatrate.iter().map(|p| p.provider_name.clone()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tv_search_hit_deserialization() {
        let json = r#"{
            "id": 1396,
            "name": "Breaking Bad",
            "overview": "A chemistry teacher turns to crime.",
            "first_air_date": "2008-01-20"
        }"#;

        let hit: TvSearchHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.id, 1396);
        assert_eq!(hit.name.as_deref(), Some("Breaking Bad"));
        assert_eq!(hit.first_air_date.as_deref(), Some("2008-01-20"));
    }

    #[test]
    fn test_tv_list_response_empty_results() {
        let response: TvListResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(response.results.is_empty());

        // TMDB occasionally omits the field entirely
        let response: TvListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_tv_details_genre_names() {
        let json = r#"{
            "id": 1396,
            "name": "Breaking Bad",
            "genres": [{"name": "Drama"}, {}, {"name": "Crime"}],
            "overview": "A chemistry teacher turns to crime."
        }"#;

        let details: TvDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.genre_names(), vec!["Drama", "Crime"]);
    }

    #[test]
    fn test_watch_provider_region_extraction() {
        let json = r#"{
            "results": {
                "ZA": {"flatrate": [{"provider_name": "Netflix"}]},
                "US": {"flatrate": [{"provider_name": "Hulu"}, {"provider_name": "Netflix"}]}
            }
        }"#;

        let response: WatchProviderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.provider_names("ZA"), vec!["Netflix"]);
        assert_eq!(response.provider_names("US"), vec!["Hulu", "Netflix"]);
        assert!(response.provider_names("FR").is_empty());
    }

    #[test]
    fn test_watch_provider_missing_flatrate() {
        let json = r#"{"results": {"ZA": {}}}"#;
        let response: WatchProviderResponse = serde_json::from_str(json).unwrap();
        assert!(response.provider_names("ZA").is_empty());
    }
}
