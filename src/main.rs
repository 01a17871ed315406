use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wall_planner::adapters::inbound::{router, AppState};
use wall_planner::adapters::outbound::{
    init_domain_logger, InMemoryTrajectoryStore, PostgresTrajectoryStore,
};
use wall_planner::application::{CoverageService, PlanCache, TrajectoryService};
use wall_planner::config::StorageBackend;
use wall_planner::domains::coverage::TrajectoryStore;
use wall_planner::domains::playback::PlaybackStreamer;
use wall_planner::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("WALL_PLANNER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));
    let config = Config::load(Some(&config_path))?;

    // The file logger (if any) must claim the `log` facade before tracing does.
    let logger = init_domain_logger(&config.logging);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    info!("Starting Wall Planner");
    info!("Storage backend: {:?}", config.storage.backend);

    let store: Arc<dyn TrajectoryStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryTrajectoryStore::new()),
        StorageBackend::Postgres => Arc::new(
            PostgresTrajectoryStore::connect(&config.postgres)
                .await
                .context("failed to connect trajectory store")?,
        ),
    };

    let cache = Arc::new(PlanCache::new());
    let coverage = CoverageService::new(store.clone(), cache.clone(), config.cache_ttl(), logger.clone());
    let trajectories = TrajectoryService::new(store.clone(), logger.clone());
    let streamer = PlaybackStreamer::new(store, config.playback_interval(), logger.clone());
    info!("Playback interval: {:?}", streamer.interval());

    let state = AppState {
        coverage: Arc::new(coverage),
        trajectories: Arc::new(trajectories),
        streamer: Arc::new(streamer),
        default_step: config.planner.default_step,
        logger,
    };
    let app = router(state, &config.server.allowed_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    cache.clear();
    info!("Shutting down Wall Planner");
    Ok(())
}
