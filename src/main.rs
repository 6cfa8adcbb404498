//! tip-pool-server entry point.
//!
//! Starts the Axum HTTP server in front of the tip distribution engine and
//! the persisted staff roster.

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tip_pool_engine::api::{AppState, create_router};
use tip_pool_engine::config::{ConfigLoader, ServerSettings};
use tip_pool_engine::store::{AppStore, JsonFileStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = ServerSettings::from_env()?;
    tracing::info!(addr = %settings.listen_addr, "starting tip-pool-server");

    let config = match &settings.config_dir {
        Some(dir) => ConfigLoader::load(dir)?,
        None => ConfigLoader::builtin(),
    };
    tracing::info!(
        roles = config.policy().roles().len(),
        full_shift_unit = %config.policy().full_shift_unit(),
        "pool policy loaded"
    );

    let storage = JsonFileStorage::new(&settings.data_file);
    let store = AppStore::with_storage(config.policy().clone(), Box::new(storage));
    let app_state = AppState::new(config, store);

    let app = create_router(app_state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(settings.listen_addr).await?;
    tracing::info!(
        addr = %settings.listen_addr,
        data_file = %settings.data_file.display(),
        "server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
