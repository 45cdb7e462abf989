//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use reviews_repository::DatabasePoolInterface;
use reviews_service::ReviewService;
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub review_service: Arc<dyn ReviewService>,
    /// Pinged by the readiness probe. Without it the service reports ready.
    pub database: Option<Arc<dyn DatabasePoolInterface>>,
    /// Renders `/metrics` when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(review_service: Arc<dyn ReviewService>) -> Self {
        Self {
            review_service,
            database: None,
            metrics: None,
        }
    }

    /// Resolves the services from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module + HasComponent<dyn ReviewService> + HasComponent<dyn DatabasePoolInterface>,
    {
        let review_service: Arc<dyn ReviewService> = module.resolve();
        let database: Arc<dyn DatabasePoolInterface> = module.resolve();
        Self::new(review_service).with_database(database)
    }

    #[must_use]
    pub fn with_database(mut self, database: Arc<dyn DatabasePoolInterface>) -> Self {
        self.database = Some(database);
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
