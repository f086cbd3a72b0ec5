//! Liveness report served at `/health`.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use apkwatch_event_bus::EventBus;

/// Status string of a running daemon.
pub const STATUS_OK: &str = "ok";

/// Health report body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Always `"ok"` while the process serves requests
    pub status: String,
    /// Time the report was generated
    pub time: DateTime<Utc>,
    /// Seconds since the daemon started
    pub uptime_secs: u64,
    /// Currently registered stream subscribers
    pub subscribers: usize,
}

impl HealthReport {
    /// Snapshot of the daemon state.
    pub fn collect(bus: &EventBus, start_time: Instant) -> Self {
        Self {
            status: STATUS_OK.to_owned(),
            time: Utc::now(),
            uptime_secs: start_time.elapsed().as_secs(),
            subscribers: bus.subscriber_count(),
        }
    }
}
