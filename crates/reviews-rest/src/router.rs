//! Main application router.

use crate::{
    controllers::{health_controller, metrics_controller, review_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, routing::get, Router};
use reviews_config::{ObservabilityConfig, ServerConfig};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    observability: &ObservabilityConfig,
) -> Router {
    let cors = create_cors_layer(server_config);

    let mut router = Router::new()
        .merge(health_controller::router())
        .merge(review_controller::router());

    if observability.metrics_enabled && state.metrics.is_some() {
        router = router.route(
            &observability.metrics_path,
            get(metrics_controller::metrics_handler),
        );
    }

    let router = router
        .with_state(state)
        // Swagger UI and OpenAPI document
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        // Add middleware layers
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with review endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Product Reviews API v1"
}
