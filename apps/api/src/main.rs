mod config;
mod db;
mod errors;
mod models;
mod portfolio;
mod render;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, DraftBackend};
use crate::db::{create_pool, ensure_schema};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{
    DraftBuffer, DraftStore, MemoryDraftStore, MemorySnapshotArchive, PgSnapshotArchive,
    RedisDraftStore, SnapshotArchive,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    let (store, archive) = match config.draft_backend {
        DraftBackend::Redis => {
            // Initialize PostgreSQL
            let db = create_pool(&config.database_url).await?;
            ensure_schema(&db).await?;

            // Initialize Redis
            let redis = redis::Client::open(config.redis_url.clone())?;
            info!("Redis client initialized");

            // Initialize S3 / MinIO
            let s3 = build_s3_client(&config).await;
            info!("S3 client initialized");

            let store: Arc<dyn DraftStore> =
                Arc::new(RedisDraftStore::new(redis, config.draft_key_prefix.clone()));
            let archive: Arc<dyn SnapshotArchive> =
                Arc::new(PgSnapshotArchive::new(db, s3, config.s3_bucket.clone()));
            (store, archive)
        }
        DraftBackend::Memory => {
            warn!("DRAFT_BACKEND=memory: drafts and snapshots are not persisted");
            let store: Arc<dyn DraftStore> = Arc::new(MemoryDraftStore::new());
            let archive: Arc<dyn SnapshotArchive> = Arc::new(MemorySnapshotArchive::new());
            (store, archive)
        }
    };

    let drafts = DraftBuffer::new(store, Duration::from_millis(config.preview_debounce_ms));
    info!("Draft debounce: {}ms", config.preview_debounce_ms);

    // Build app state
    let state = AppState {
        drafts: drafts.clone(),
        archive,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Typing that has not gone quiet yet still gets written.
    drafts.flush_all().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "folio-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
