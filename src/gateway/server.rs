//! Gateway server: shared state, router assembly, serving loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{
    HeaderValue, CONTENT_TYPE, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};
use axum::http::{HeaderName, Method};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::GatewayConfig;
use crate::executor::{QueryExecutor, QueryResult};
use crate::observability::Logger;
use crate::statement::build;
use crate::validate::Whitelist;

use super::access_log;
use super::auth;
use super::errors::GatewayError;
use super::handlers;
use super::rate_limit::{self, RateLimiter};
use super::request::RawQueryRequest;

/// Payload-size ceiling for request bodies.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// State shared by every handler and middleware. Nothing here is mutable
/// across requests except the rate limiter's counters.
pub struct GatewayState {
    pub config: GatewayConfig,
    pub whitelist: Whitelist,
    pub executor: Arc<dyn QueryExecutor>,
    pub limiter: RateLimiter,
    pub started: Instant,
}

impl GatewayState {
    /// Run one request through the pipeline:
    /// parse → validate → build → execute → shape.
    ///
    /// Validation failures return before any downstream call is made.
    pub async fn dispatch(&self, raw: RawQueryRequest) -> Result<QueryResult, GatewayError> {
        let (table, op) = raw.into_parts()?;
        self.whitelist.validate_table(&table)?;

        if op.is_raw() && !self.config.allow_raw {
            return Err(GatewayError::RawDisabled);
        }

        let stmt = build(&table, &op)?;
        let response = self.executor.execute(&stmt).await?;
        Ok(QueryResult::shape(&op, response))
    }
}

/// The HTTP gateway service.
pub struct GatewayServer {
    state: Arc<GatewayState>,
}

impl GatewayServer {
    /// Create a server from configuration and a statement executor.
    pub fn new(config: GatewayConfig, executor: Arc<dyn QueryExecutor>) -> Self {
        let whitelist = config.whitelist();
        let limiter = RateLimiter::new(&config.rate_limit);
        Self {
            state: Arc::new(GatewayState {
                config,
                whitelist,
                executor,
                limiter,
                started: Instant::now(),
            }),
        }
    }

    /// The shared state (for tests).
    pub fn state(&self) -> Arc<GatewayState> {
        self.state.clone()
    }

    /// Build the router with all endpoints and cross-cutting layers.
    pub fn router(&self) -> Router {
        let state = self.state.clone();

        // Query endpoints sit behind the API key; the health probe does not.
        let protected = Router::new()
            .route(
                "/query",
                get(handlers::query_usage).post(handlers::run_query),
            )
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_api_key,
            ));

        Router::new()
            .route("/", get(handlers::health))
            .merge(protected)
            .layer(middleware::from_fn(access_log::record))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit::enforce,
            ))
            .layer(cors_layer(&state.config.allowed_origins))
            .layer(SetResponseHeaderLayer::overriding(
                X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            ))
            .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
            .with_state(state)
    }

    /// Bind and serve until a shutdown signal arrives, then drain in-flight
    /// requests and return.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .state
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{e}")))?;

        let port = addr.port().to_string();
        Logger::info(
            "SERVER_START",
            &[
                ("port", port.as_str()),
                ("downstream_url", self.state.config.downstream_url.as_str()),
            ],
        );

        let listener = TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

/// CORS restricted to the configured origins; permissive when none are
/// configured (development). Methods and headers match the query contract.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let x_api_key = HeaderName::from_static("x-api-key");
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, x_api_key]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    Logger::info("SHUTDOWN", &[("reason", "signal")]);
}
