/// TMDB API provider
///
/// API Flow:
/// 1. Title resolution: /search/tv → ranked hits, then /tv/{id} for attributes
/// 2. Candidate expansion: /tv/{id}/similar → ranked related series
/// 3. Availability: /tv/{id}/watch/providers → per-region listings
///
/// All requests carry the api_key query parameter and a finite timeout.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{TvDetails, TvListResponse, TvSearchHit, WatchProviderResponse},
    services::providers::TvCatalog,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: String, api_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(AppError::HttpClient)?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    /// Issues a GET with the API key appended and checks the response status
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        extra_params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(extra_params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl TvCatalog for TmdbCatalog {
    async fn search_tv(&self, query: &str) -> AppResult<Vec<TvSearchHit>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let response: TvListResponse = self
            .get_json("/search/tv", &[("query", query), ("include_adult", "false")])
            .await?;

        tracing::info!(
            query = %query,
            results = response.results.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(response.results)
    }

    async fn tv_details(&self, tv_id: u64) -> AppResult<TvDetails> {
        let details: TvDetails = self.get_json(&format!("/tv/{}", tv_id), &[]).await?;

        tracing::debug!(
            tv_id = tv_id,
            genres = details.genres.len(),
            provider = "tmdb",
            "Details fetched"
        );

        Ok(details)
    }

    async fn similar_tv(&self, tv_id: u64) -> AppResult<Vec<TvSearchHit>> {
        let response: TvListResponse =
            self.get_json(&format!("/tv/{}/similar", tv_id), &[]).await?;

        tracing::debug!(
            tv_id = tv_id,
            results = response.results.len(),
            provider = "tmdb",
            "Similar titles fetched"
        );

        Ok(response.results)
    }

    async fn watch_providers(&self, tv_id: u64) -> AppResult<WatchProviderResponse> {
        let response: WatchProviderResponse = self
            .get_json(&format!("/tv/{}/watch/providers", tv_id), &[])
            .await?;

        tracing::debug!(
            tv_id = tv_id,
            regions = response.results.len(),
            provider = "tmdb",
            "Watch providers fetched"
        );

        Ok(response)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
