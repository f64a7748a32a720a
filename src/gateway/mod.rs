//! HTTP Gateway Module
//!
//! Routes object requests to the backing bucket after authorization.

mod handler;

use std::sync::Arc;

use axum::routing::any;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::Authorizer;
use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::store::Bucket;

/// Shared request state
pub struct AppState {
    /// Authorization predicate
    pub authorizer: Authorizer,
    /// Backing bucket
    pub bucket: Bucket,
}

/// HTTP gateway server
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
}

impl GatewayServer {
    /// Create a new gateway server
    pub fn new(config: GatewayConfig, bucket: Bucket) -> Self {
        let state = Arc::new(AppState {
            authorizer: Authorizer::new(&config.auth),
            bucket,
        });

        Self { config, state }
    }

    /// Get the state for sharing with other components
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Create the router
    ///
    /// Every path maps to the same handler; the object key is the request
    /// path with one leading slash stripped.
    pub fn create_router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/", any(handler::handle_request))
            .route("/*key", any(handler::handle_request))
            .with_state(state)
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<()> {
        let mut app = Self::create_router(Arc::clone(&self.state))
            .layer(TraceLayer::new_for_http());

        if self.config.server.cors_enabled {
            app = app.layer(CorsLayer::permissive());
        }

        let listener = tokio::net::TcpListener::bind(&self.config.server.bind_address).await?;
        tracing::info!("Gateway listening on {}", self.config.server.bind_address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Network(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
