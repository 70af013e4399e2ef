//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::time::Duration;

use axum::{Router, middleware};
use axum_server::Handle;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::core::{Config, Result, ServerState};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::health::router())
        // Catalog APIs
        .merge(crate::api::components::router())
        .merge(crate::api::packs::router())
        .merge(crate::api::services::router())
        // Lifecycle APIs
        .merge(crate::api::daily_menus::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::days::router())
        .merge(crate::api::kitchen::router())
        .merge(crate::api::invoices::router())
}

/// Build the full application with state and middleware layers
pub fn build_app_with_state(state: ServerState) -> Router {
    build_app()
        .with_state(state)
        // Tower HTTP 中间件
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_app_with_state(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Cantina server listening on {}", addr);

        // Graceful shutdown on ctrl-c
        let handle = Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}
