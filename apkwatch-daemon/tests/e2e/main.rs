//! E2E tests for apkwatch-daemon.
//!
//! Each test starts a daemon on an ephemeral port and talks to it over a
//! plain TCP socket.
//!
//! # Test Structure
//!
//! - `helpers/` -- config builder, daemon launcher, raw HTTP client
//! - `scenarios/` -- one file per scenario
//!
//! # Running
//!
//! ```bash
//! cargo test -p apkwatch-daemon --test e2e
//! ```

mod helpers;
mod scenarios;
