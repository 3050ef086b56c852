use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use nextwatch_api::{
    api::{create_router, AppState},
    config::Config,
    services::providers::tmdb::TmdbCatalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Fails here with a specific message when TMDB_API_KEY is missing
    let config = Config::from_env()?;

    let catalog = Arc::new(TmdbCatalog::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    )?);

    let state = AppState::new(catalog, &config);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "nextwatch-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
