//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::observability::{log_event, Event};
use crate::sections::SectionStore;

use super::config::HttpServerConfig;
use super::csv_routes::{csv_routes, CsvExportState};
use super::observability_routes::health_routes;

/// HTTP server for the course CSV API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(store: Arc<dyn SectionStore>) -> Self {
        Self::with_config(HttpServerConfig::default(), store)
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, store: Arc<dyn SectionStore>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, store: Arc<dyn SectionStore>) -> Router {
        let csv_state = Arc::new(CsvExportState::new(store, config.export.clone()));

        let cors = if config.cors_origins.is_empty() {
            // No origins configured: permissive, for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            // Health check at root level
            .merge(health_routes())
            // Course CSV downloads under /api/courses/csv
            .nest("/api/courses/csv", csv_routes(csv_state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        log_event(
            Event::Serving,
            &format!("CSV export available at http://{}/api/courses/csv/quarter", addr),
        );
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
