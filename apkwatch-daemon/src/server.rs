//! HTTP server assembly: shared state, routes, middleware.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use apkwatch_core::config::{ApkwatchConfig, FeedConfig};
use apkwatch_core::error::ServerError;
use apkwatch_event_bus::{EventBus, SessionConfig};

use crate::handlers;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Fan-out to streaming sessions
    pub bus: EventBus,
    /// Timing of new streaming sessions
    pub session: SessionConfig,
    /// Emit `event:` lines in SSE frames
    pub named_events: bool,
    /// Threat feed settings
    pub feed: Arc<FeedConfig>,
    /// Cancelled when the daemon shuts down
    pub shutdown: CancellationToken,
    /// Daemon start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        config: &ApkwatchConfig,
        bus: EventBus,
        shutdown: CancellationToken,
        start_time: Instant,
    ) -> Self {
        Self {
            bus,
            session: SessionConfig::from_core(&config.stream),
            named_events: config.stream.named_events,
            feed: Arc::new(config.feed.clone()),
            shutdown,
            start_time,
        }
    }
}

/// Builds the application router.
///
/// # Errors
///
/// `allow_origin` is neither `*` nor a valid header value.
pub fn router(state: AppState, allow_origin: &str) -> Result<Router> {
    Ok(Router::new()
        .route("/api/scan", get(handlers::scan))
        .route("/api/threats/latest", get(handlers::latest_threats))
        .route("/events", get(handlers::events))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allow_origin)?)
        .with_state(state))
}

/// `*` allows any origin without credentials; a concrete origin is matched
/// exactly and may send credentials.
pub fn cors_layer(allow_origin: &str) -> Result<CorsLayer> {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CACHE_CONTROL, header::CONTENT_TYPE]);

    let origin = allow_origin.trim();
    if origin == "*" {
        return Ok(base.allow_origin(AllowOrigin::any()));
    }

    let value = HeaderValue::from_str(origin)
        .map_err(|e| anyhow::anyhow!("invalid allow_origin '{}': {}", origin, e))?;
    Ok(base
        .allow_origin(AllowOrigin::exact(value))
        .allow_credentials(true))
}

/// Binds the API listener.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr).await.map_err(|e| ServerError::Bind {
        addr: addr.to_string(),
        reason: e.to_string(),
    })
}

/// Serves `app` until `shutdown` is cancelled and open connections finish.
///
/// Streaming sessions observe the same token, so they end and let the
/// graceful shutdown complete.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(listen_addr = %addr, "HTTP server listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))
}
