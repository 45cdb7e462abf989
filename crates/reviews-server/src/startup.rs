//! Server startup utilities.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use reviews_config::ObservabilityConfig;
use reviews_core::{ReviewsError, ReviewsResult};
use std::time::Duration;
use tracing::{error, info};

/// How often the Prometheus recorder drains its histogram buffers.
const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____            _
   / __ \___ _   __(_)__ _      _______
  / /_/ / _ \ | / / / _ \ | /| / / ___/
 / _, _/  __/ |/ / /  __/ |/ |/ (__  )
/_/ |_|\___/|___/_/\___/|__/|__/____/

                 Product Reviews
    "#);
}

/// Lines logged once the listener is bound.
#[must_use]
pub fn startup_lines(addr: &str, observability: &ObservabilityConfig) -> Vec<String> {
    let mut lines = vec![
        format!("REST API:  http://{addr}/reviews"),
        format!("Health:    http://{addr}/health"),
        format!("API Docs:  http://{addr}/swagger-ui"),
    ];
    if observability.metrics_enabled {
        lines.push(format!("Metrics:   http://{addr}{}", observability.metrics_path));
    }
    lines
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str, observability: &ObservabilityConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    for line in startup_lines(addr, observability) {
        info!("{}", line);
    }
    info!("{}", separator);
}

/// Installs the global Prometheus recorder and describes the service metrics.
///
/// Must be called from within a Tokio runtime; a background task keeps the
/// recorder's histograms drained.
pub fn install_metrics_recorder() -> ReviewsResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ReviewsError::Configuration(format!("Failed to install metrics recorder: {e}")))?;

    reviews_service::metrics::register_metrics();

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(METRICS_UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_startup_lines_include_metrics_path() {
        let observability = ObservabilityConfig {
            metrics_path: "/internal/metrics".to_string(),
            ..ObservabilityConfig::default()
        };

        let lines = startup_lines("0.0.0.0:5000", &observability);
        assert_eq!(lines[0], "REST API:  http://0.0.0.0:5000/reviews");
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Metrics:   http://0.0.0.0:5000/internal/metrics")
        );
    }

    #[test]
    fn test_startup_lines_without_metrics() {
        let observability = ObservabilityConfig {
            metrics_enabled: false,
            ..ObservabilityConfig::default()
        };

        let lines = startup_lines("127.0.0.1:8080", &observability);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| !line.starts_with("Metrics")));
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info("0.0.0.0:5000", &ObservabilityConfig::default());
    }
}
