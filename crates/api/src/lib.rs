//! HTTP API server with observability for event listings.
//!
//! Serves classified listings, rendered tables and single-event details
//! fetched from a SPARQL endpoint, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use processor::{EventQueryRunner, RowRenderer};
use sparql::SparqlEndpoint;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::events::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<E: SparqlEndpoint + 'static>(
    state: Arc<AppState<E>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/events", get(routes::events::list::<E>))
        .route("/events/table", get(routes::events::table::<E>))
        .route("/events/detail", get(routes::events::detail::<E>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around `endpoint`, rendering tables as
/// `config` describes.
pub fn create_state<E: SparqlEndpoint>(endpoint: E, config: &Config) -> Arc<AppState<E>> {
    Arc::new(AppState {
        runner: EventQueryRunner::new(endpoint),
        renderer: RowRenderer::new(config.details_base.as_str()),
        table_caption: config.table_caption.clone(),
    })
}
