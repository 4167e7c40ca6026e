//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, timeout, metrics)
//! - Bind server to listener and serve until shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ContributorsConfig, ServiceConfig, StatsConfig};
use crate::http::cors::{cors_middleware, Cors};
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::upstream::{CredentialProvider, EnvCredentials, GithubClient, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: GithubClient,
    pub contributors: ContributorsConfig,
    pub stats: StatsConfig,
}

impl AppState {
    pub fn new(config: &ServiceConfig, credentials: Arc<dyn CredentialProvider>) -> UpstreamResult<Self> {
        let client = GithubClient::new(&config.upstream, &config.timeouts, credentials)?;
        Ok(Self {
            client,
            contributors: config.contributors.clone(),
            stats: config.stats.clone(),
        })
    }
}

/// HTTP server for the proxy endpoints.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server whose credential comes from `upstream.token_env`.
    pub fn new(config: ServiceConfig) -> UpstreamResult<Self> {
        let credentials = Arc::new(EnvCredentials::new(config.upstream.token_env.clone()));
        Self::with_credentials(config, credentials)
    }

    /// Create a server with an explicit credential provider.
    pub fn with_credentials(
        config: ServiceConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> UpstreamResult<Self> {
        let state = AppState::new(&config, credentials)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer order, outermost first: request ID, trace span, request ID
    /// echo, CORS, timeout. CORS sits outside the timeout so 408s and
    /// router 404/405s are decorated too.
    #[allow(deprecated)]
    pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let cors = Cors::from_config(&config.cors);

        Router::new()
            .route("/api/github-contributors", get(handlers::list_contributors))
            .route("/api/github-contributors/all", get(handlers::list_all_contributors))
            .route("/api/github-data", get(handlers::profile_stats))
            .route("/api/github-calendar", get(handlers::contribution_calendar))
            .route("/health", get(handlers::health))
            .route_layer(middleware::from_fn(track_requests))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id(request),
                        )
                    }))
                    .layer(propagate_request_id_layer())
                    .layer(middleware::from_fn_with_state(cors, cors_middleware))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Router for in-process use (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// an OS signal or `shutdown.trigger()`.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            user_selection = self.config.stats.allow_user_selection,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.listen())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Per-route request counter and latency histogram.
async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    let status = response.status();
    if status.is_server_error() {
        tracing::warn!(endpoint = %endpoint, status = %status, "Request failed");
    }
    metrics::record_request(&endpoint, status.as_u16(), start);
    response
}
