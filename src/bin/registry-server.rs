//! Registry service HTTP server.
//!
//! Store selection: `DATABASE_URL` picks the Postgres backend; without it
//! the server runs on the in-memory store.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use registry_service::config::ServiceConfig;
use registry_service::probe::HttpProbe;
use registry_service::service::RegistryService;
use registry_service::store::{InMemoryRegistryStore, PgRegistryStore, RegistryStore};
use registry_service::web::{self, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    registry_service::logging::init_logging();

    let config = ServiceConfig::from_env().context("failed to load configuration")?;

    let store: Arc<dyn RegistryStore> = match &config.database_url {
        Some(url) => {
            let store = PgRegistryStore::connect(url)
                .await
                .context("failed to connect to postgres")?;
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, registry records will not survive restarts");
            Arc::new(InMemoryRegistryStore::new())
        }
    };

    let probe = Arc::new(HttpProbe::new(config.probe_timeout()));
    let service = RegistryService::new(store, probe);
    let state = AppState::new(config.clone(), service);
    let app = web::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!(bind_address = %config.bind_address, "registry service listening");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}
