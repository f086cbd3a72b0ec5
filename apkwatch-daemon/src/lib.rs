//! apkwatch daemon library.
//!
//! Exposes the daemon internals for integration testing; production use goes
//! through the `apkwatch-daemon` binary.

pub mod cli;
pub mod handlers;
pub mod health;
pub mod logging;
pub mod metrics_server;
pub mod orchestrator;
pub mod server;
