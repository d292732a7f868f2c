use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use library_recs::{
    api::{create_router, AppState, WidgetSettings},
    config::Config,
    services::providers::LibraryApiClient,
    storage::{create_redis_client, MemoryStore, RedisStore, SessionStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Session storage
    let store: Arc<dyn SessionStore> = match &config.redis_url {
        Some(redis_url) => {
            tracing::info!("Using Redis session store");
            Arc::new(RedisStore::new(
                create_redis_client(redis_url)?,
                config.session_ttl_secs,
            ))
        }
        None => {
            tracing::info!("REDIS_URL not set, using in-memory session store");
            Arc::new(MemoryStore::new())
        }
    };

    // Library application client (recommendations + circulation actions),
    // bound per request to the reader's library session cookie
    let library = Arc::new(LibraryApiClient::new(
        &config.library_api_url,
        config.request_timeout(),
    )?);

    let state = AppState::with_library(store, library, WidgetSettings::from(&config));

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        library_api = %config.library_api_url,
        "Recommendations widget server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
