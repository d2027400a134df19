use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::views::PageRenderer;
use crate::domain::models::ServerConfig;
use crate::services::CompletionPipeline;

/// Shared state for all handlers.
pub struct AppState {
    pub pipeline: Arc<CompletionPipeline>,
    pub pages: PageRenderer,
}

impl AppState {
    pub fn new(pipeline: Arc<CompletionPipeline>) -> Result<Self, handlebars::TemplateError> {
        Ok(Self {
            pipeline,
            pages: PageRenderer::new()?,
        })
    }
}

/// Web UI server.
pub struct WebServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// Build the router.
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/generate", post(handlers::generate_page))
            .route("/api/generate", post(handlers::generate_api))
            .route("/api/options", get(handlers::list_options))
            .route("/health", get(handlers::health_check))
            .with_state(Arc::clone(&self.state))
            .layer(TraceLayer::new_for_http())
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        tracing::info!("ProjectGPT listening on http://{}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
