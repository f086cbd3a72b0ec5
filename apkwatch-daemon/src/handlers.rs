//! HTTP handlers.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /api/scan` | [`scan`] |
//! | `GET /events` | [`events`] |
//! | `GET /api/threats/latest` | [`latest_threats`] |
//! | `GET /health` | [`health`] |

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::{self, HeaderName};
use axum::response::sse::{Event as SseEvent, Sse};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use apkwatch_core::event::{Event, StreamEvent};
use apkwatch_core::types::RiskPayload;
use apkwatch_event_bus::{EventBus, StreamSession};
use apkwatch_risk_engine::{ThreatFeed, build_feed, compute_risk};

use crate::health::HealthReport;
use crate::server::AppState;

/// Identifier scanned when the request names none.
pub const DEFAULT_SCAN_IDENTIFIER: &str = "com.example.calculatorplus";

/// Disables response buffering in nginx-style reverse proxies.
const X_ACCEL_BUFFERING: &str = "x-accel-buffering";

/// Query keys naming the scanned identifier, in priority order.
const SCAN_KEYS: [&str; 2] = ["identifier", "package"];

/// `/api/threats/latest` query string.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<usize>,
}

/// Computes the payload for `identifier` and broadcasts it as a `scan` event.
///
/// The publish outcome is only logged; the payload is returned either way.
pub fn scan_and_publish(bus: &EventBus, identifier: &str) -> Arc<RiskPayload> {
    let payload = Arc::new(compute_risk(identifier));
    let event = StreamEvent::scan(Arc::clone(&payload));
    let trace_id = event.metadata().trace_id.clone();
    let report = bus.publish(event);

    info!(
        package = %payload.package,
        score = payload.risk_score,
        level = %payload.risk_level,
        trace_id = %trace_id,
        delivered = report.delivered,
        dropped = report.dropped,
        "scan published"
    );
    payload
}

/// Identifier named by `/api/scan` query pairs.
///
/// The first `identifier` wins, then the first `package`; repeated keys are
/// not an error. Without either key the demo default is scanned.
pub fn scan_identifier(pairs: &[(String, String)]) -> &str {
    SCAN_KEYS
        .iter()
        .find_map(|key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        })
        .unwrap_or(DEFAULT_SCAN_IDENTIFIER)
}

/// `GET /api/scan?identifier=<id>` (alias `package=<id>`)
///
/// Never rejects a request because of its query string.
pub async fn scan(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<Arc<RiskPayload>> {
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(e) => {
            warn!(error = %e, "unreadable scan query, using default identifier");
            Vec::new()
        }
    };
    Json(scan_and_publish(&state.bus, scan_identifier(&pairs)))
}

/// `GET /events` -- one streaming session per connection.
///
/// The session is closed when the client disconnects (the response stream is
/// dropped) or the daemon shuts down.
pub async fn events(State(state): State<AppState>) -> Response {
    let session = StreamSession::open(&state.bus, state.session, state.shutdown.clone());
    let named = state.named_events;

    let stream = session
        .into_stream()
        .filter_map(move |event| sse_event(&event, named).map(Ok::<_, Infallible>));

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (HeaderName::from_static(X_ACCEL_BUFFERING), "no"),
        ],
        Sse::new(stream),
    )
        .into_response()
}

/// Encodes a stream event as an SSE frame: `[event: <type>\n]data: <json>\n\n`.
pub fn sse_event(event: &StreamEvent, named: bool) -> Option<SseEvent> {
    match event.to_json() {
        Ok(json) => {
            let frame = if named {
                SseEvent::default().event(event.event_type())
            } else {
                SseEvent::default()
            };
            Some(frame.data(json))
        }
        Err(e) => {
            warn!(event_id = event.event_id(), error = %e, "failed to encode stream event, skipping");
            None
        }
    }
}

/// `GET /api/threats/latest?limit=<n>`
pub async fn latest_threats(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Json<ThreatFeed> {
    let limit = query.limit.unwrap_or(state.feed.default_limit);
    Json(build_feed(&state.feed.identifiers, limit))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::collect(&state.bus, state.start_time))
}
