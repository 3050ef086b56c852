use std::sync::Arc;

use crate::{
    config::Config,
    services::providers::{RequestPacer, TvCatalog},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn TvCatalog>,
    pub pacer: RequestPacer,
    /// Default region for availability lookups; requests may override it
    pub default_region: String,
}

impl AppState {
    pub fn new(catalog: Arc<dyn TvCatalog>, config: &Config) -> Self {
        Self {
            catalog,
            pacer: RequestPacer::new(config.request_delay_ms),
            default_region: config.region.clone(),
        }
    }
}
