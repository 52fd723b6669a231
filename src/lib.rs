pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::services::{AllocationService, ReservationCoordinator};
use crate::storage::{MemorySeatStore, PgSeatStore, SeatStore};

// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn AllocationService>,
    pub cache: cache::CacheService,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let service = build_service(&config).await?;
        let cache = cache::CacheService::connect(
            config.redis.url.as_deref(),
            config.redis.seat_map_ttl_secs,
        )
        .await?;
        if cache.is_enabled() {
            info!("Redis connected, seat map cache enabled");
        }

        Ok(Arc::new(Self { service, cache, config }))
    }
}

async fn build_service(config: &Config) -> anyhow::Result<Arc<dyn AllocationService>> {
    let layout = config.layout.seat_layout();
    let max = config.layout.max_seats_per_request;

    let service: Arc<dyn AllocationService> = match config.storage.backend {
        StoreBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let db = database::Database::from_config(&config.storage, url).await?;
            info!("Database connected");
            db.run_migrations().await?;

            let store = PgSeatStore::new(db, config.storage.lock_timeout_ms);
            store.provision(layout.total_seats).await?;
            Arc::new(ReservationCoordinator::new(store, layout, max)) as Arc<dyn AllocationService>
        }
        StoreBackend::Memory => {
            let store = MemorySeatStore::new();
            store.provision(layout.total_seats).await?;
            info!("Using in-memory seat store");
            Arc::new(ReservationCoordinator::new(store, layout, max))
        }
    };

    Ok(service)
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Coach booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes(state.clone()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
