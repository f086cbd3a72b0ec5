//! E2E test scenarios.

mod config_error;
mod lifecycle;
mod shutdown;
mod stream_flow;
