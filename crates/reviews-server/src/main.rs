//! # Reviews Server
//!
//! Entry point for the product reviews service.

use reviews_config::{AppConfig, ConfigLoader};
use reviews_core::telemetry::init_tracing;
use reviews_core::{ReviewsError, ReviewsResult};
use reviews_rest::{create_router, AppState};
use reviews_server::{
    build_reviews_module, database, install_metrics_recorder, print_banner, print_startup_info,
    shutdown_signal,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config.observability.telemetry()) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    print_banner();
    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

fn load_config() -> ReviewsResult<AppConfig> {
    Ok(ConfigLoader::from_default_location()?.into_config())
}

async fn run(config: AppConfig) -> ReviewsResult<()> {
    let metrics = if config.observability.metrics_enabled {
        Some(install_metrics_recorder()?)
    } else {
        None
    };

    let module = build_reviews_module(&config).await?;
    let db = database(&module);

    if config.database.run_migrations {
        db.run_migrations().await?;
    }

    let mut state = AppState::from_module(module.as_ref());
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    let router = create_router(state, &config.server, &config.observability);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ReviewsError::Internal(format!("Failed to bind {addr}: {e}")))?;

    print_startup_info(&addr, &config.observability);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ReviewsError::Internal(format!("Server error: {e}")))?;

    db.close().await;
    info!("Server shut down");
    Ok(())
}
