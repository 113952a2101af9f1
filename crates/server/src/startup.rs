use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use configs::StoreBackend;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::counter::{CounterStore, MemoryCounterStore, SeaOrmCounterStore};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration from config.toml, falling back to env vars when the
/// file is absent; env overrides (STORE_BACKEND, DATABASE_URL) apply either way
fn load_config() -> anyhow::Result<configs::AppConfig> {
    let mut cfg = configs::load_default().unwrap_or_else(|_| {
        let mut cfg = configs::AppConfig::default();
        cfg.server.host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        cfg.server.port = env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        cfg
    });
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

/// Build the counter store selected by configuration. For the database
/// backend, the schema is created idempotently before the store is handed out.
async fn build_store(cfg: &configs::AppConfig) -> anyhow::Result<Arc<dyn CounterStore>> {
    match cfg.store.backend {
        StoreBackend::Memory => {
            info!(backend = "memory", "counter store ready");
            Ok(Arc::new(MemoryCounterStore::new()))
        }
        StoreBackend::Database => {
            let db = if cfg.database.url.trim().is_empty() {
                models::db::connect().await?
            } else {
                models::db::connect_with_config(&cfg.database).await?
            };
            migration::Migrator::up(&db, None).await?;
            info!(backend = "database", "counter store ready");
            Ok(Arc::new(SeaOrmCounterStore::new(db)))
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;
    let store = build_store(&cfg).await?;
    let state = ServerState { store };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting counter server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
