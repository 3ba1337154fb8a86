//! Customer server: loads configuration from the environment, opens the configured store
//! and serves the API and pages.
//!
//! Run from repo root: `cargo run -p customer-server`

use fin_customer::{
    app, ensure_database_exists, AppConfig, AppState, CustomerStore, MemoryCustomerStore,
    PgCustomerStore, StoreBackend,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fin_customer=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let store: Arc<dyn CustomerStore> = match config.store {
        StoreBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let store =
                PgCustomerStore::connect(&config.database_url, config.max_connections, config.schema.clone())
                    .await?;
            tracing::info!(schema = %config.schema, "using postgres customer store");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory customer store; records are lost on restart");
            Arc::new(MemoryCustomerStore::new())
        }
    };

    let bind_addr = config.bind_addr;
    let base_path = config.base_path.clone();
    let state = AppState::new(store, config)?;

    let listener = TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Customer server listening on http://{}{}", addr, base_path);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
