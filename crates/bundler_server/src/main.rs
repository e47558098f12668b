use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bundler_core::TaskStore;
use bundler_engine::{ensure_artifact_dir, FetchSettings, Pipeline, ReqwestFetcher};
use bundler_logging::LogDestination;
use bundler_server::state::AppState;
use bundler_server::{config, handlers};
use tokio::net::TcpListener;

const DEFAULT_CONFIG_PATH: &str = "config.ron";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bundler_logging::initialize(LogDestination::Terminal);

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = config::load(&config_path)?;

    // Archives land in the working directory, next to the process.
    let artifact_dir = std::env::current_dir().context("could not determine working directory")?;
    ensure_artifact_dir(&artifact_dir)?;

    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default())?);
    let pipeline = Arc::new(Pipeline::new(fetcher, artifact_dir.clone()));
    let store = Arc::new(TaskStore::new(config.clone()));
    let state = AppState {
        store,
        pipeline,
        artifact_dir,
    };

    let app = handlers::build_router(state);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("could not bind port {}", config.port))?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
