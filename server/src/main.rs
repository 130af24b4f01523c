use std::{env, io, sync::Arc};

use log::info;
use tokio::signal;

use server::http::{self, AppState};
use server::storage::FsStorage;
use server::{Orchestrator, ServerConfig, TaskRegistry, recovery};

const DEFAULT_CONFIG: &str = "server.toml";

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = ServerConfig::load(&config_path).map_err(io::Error::other)?;
    info!(
        "loaded {} task(s) from {config_path}, storage at {}",
        config.tasks.len(),
        config.storage_root.display()
    );

    let storage = Arc::new(FsStorage::new(&config.storage_root)?);
    let registry = Arc::new(TaskRegistry::new(config.tasks).map_err(io::Error::other)?);

    recovery::recover_all(storage.as_ref(), &registry)
        .await
        .map_err(io::Error::other)?;

    let orchestrator = Arc::new(Orchestrator::new(storage.clone(), registry));
    let app = http::router(AppState::new(orchestrator, storage));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("listening at {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("wrapping up, shutting down...");
        })
        .await
}
