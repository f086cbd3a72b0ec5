//! Daemon lifecycle -- assembly, serving, and shutdown.
//!
//! The [`Orchestrator`] owns the validated configuration, the event bus and
//! the shutdown token shared by the HTTP server and every streaming session.
//!
//! # Startup
//!
//! 1. Install the Prometheus recorder (when enabled)
//! 2. Create the event bus
//! 3. Bind the listener, write the PID file
//! 4. Serve until SIGTERM/SIGINT
//!
//! # Shutdown
//!
//! Cancelling the token stops accepting connections, ends every open stream
//! session, stops background tasks and finally removes the PID file.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use apkwatch_core::config::ApkwatchConfig;
use apkwatch_core::metrics as m;
use apkwatch_event_bus::EventBus;

use crate::metrics_server;
use crate::server::{self, AppState};

/// Refresh period of the uptime gauge.
const UPTIME_REFRESH: Duration = Duration::from_secs(10);

/// The daemon orchestrator.
pub struct Orchestrator {
    config: ApkwatchConfig,
    bus: EventBus,
    shutdown: CancellationToken,
    start_time: Instant,
}

impl Orchestrator {
    /// Loads `config_path` (with environment overrides) and builds the daemon.
    pub async fn build(config_path: &Path) -> Result<Self> {
        let config = ApkwatchConfig::load(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        Self::build_from_config(config).await
    }

    /// Builds the daemon from an already loaded configuration.
    ///
    /// # Errors
    ///
    /// - validation fails
    /// - the metrics recorder cannot be installed
    pub async fn build_from_config(config: ApkwatchConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
            metrics_server::record_build_info();
        } else {
            tracing::debug!("metrics exporter disabled");
        }

        let bus = EventBus::from_config(&config.stream);
        tracing::info!(
            channel_capacity = bus.capacity(),
            heartbeat_interval_secs = config.stream.heartbeat_interval_secs,
            feed_identifiers = config.feed.identifiers.len(),
            "event bus ready"
        );

        Ok(Self {
            config,
            bus,
            shutdown: CancellationToken::new(),
            start_time: Instant::now(),
        })
    }

    /// Binds the configured address and serves until a shutdown signal.
    ///
    /// # Shutdown Triggers
    ///
    /// - `SIGTERM` (from systemd, Docker, or `kill`)
    /// - `SIGINT` (Ctrl+C)
    /// - cancellation of [`Orchestrator::shutdown_token`]
    pub async fn run(&mut self) -> Result<()> {
        let addr = self
            .config
            .server
            .socket_addr()
            .map_err(|e| anyhow::anyhow!("server address: {}", e))?;
        let listener = server::bind(addr).await?;

        let token = self.shutdown.clone();
        let signal_task = tokio::spawn(async move {
            tokio::select! {
                result = wait_for_shutdown_signal() => {
                    match result {
                        Ok(signal) => tracing::info!(signal = signal, "shutdown signal received"),
                        Err(e) => tracing::error!(error = %e, "signal handling failed, shutting down"),
                    }
                    token.cancel();
                }
                _ = token.cancelled() => {}
            }
        });

        let result = self.serve_on(listener).await;
        signal_task.abort();
        result
    }

    /// Serves on an already bound listener until the shutdown token fires.
    pub async fn serve_on(&mut self, listener: TcpListener) -> Result<()> {
        let pid_path = (!self.config.general.pid_file.is_empty())
            .then(|| Path::new(&self.config.general.pid_file).to_path_buf());
        if let Some(path) = &pid_path {
            write_pid_file(path)?;
        }

        let app = match self.router() {
            Ok(app) => app,
            Err(e) => {
                if let Some(path) = &pid_path {
                    remove_pid_file(path);
                }
                return Err(e);
            }
        };

        let uptime_task = self
            .config
            .metrics
            .enabled
            .then(|| spawn_uptime_updater(self.start_time, self.shutdown.clone()));

        tracing::info!("apkwatch-daemon running");
        let result = server::serve(listener, app, self.shutdown.clone()).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "HTTP server failed");
        }

        self.shutdown.cancel();
        if let Some(task) = uptime_task {
            let _ = task.await;
        }
        if let Some(path) = &pid_path {
            remove_pid_file(path);
        }

        tracing::info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "apkwatch-daemon stopped"
        );
        result.map_err(Into::into)
    }

    /// Application router over this daemon's state.
    pub fn router(&self) -> Result<Router> {
        let state = AppState::new(
            &self.config,
            self.bus.clone(),
            self.shutdown.clone(),
            self.start_time,
        );
        server::router(state, &self.config.server.allow_origin)
    }

    /// Token that stops the daemon when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &ApkwatchConfig {
        &self.config
    }
}

/// Waits for SIGTERM or SIGINT and returns the signal name.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Writes the current PID to `path`, refusing to overwrite an existing file.
///
/// The file is created atomically (`create_new`) with mode 0o600; missing
/// parent directories are created with mode 0o700.
pub(crate) fn write_pid_file(path: &Path) -> Result<()> {
    use std::fs::{self, OpenOptions};
    use std::io::{ErrorKind, Write};

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            fs::DirBuilder::new()
                .mode(0o700)
                .recursive(true)
                .create(parent)?;
        }
        #[cfg(not(unix))]
        fs::create_dir_all(parent)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let holder = fs::read_to_string(path).unwrap_or_else(|_| "unknown".to_owned());
            return Err(anyhow::anyhow!(
                "PID file {} already exists with PID: {}. Is another instance running?",
                path.display(),
                holder.trim()
            ));
        }
        Err(e) => return Err(e.into()),
    };

    if !file.metadata()?.is_file() {
        let _ = fs::remove_file(path);
        return Err(anyhow::anyhow!(
            "PID file {} is not a regular file",
            path.display()
        ));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    let pid = std::process::id();
    writeln!(file, "{pid}")?;
    tracing::info!(pid = pid, path = %path.display(), "PID file written");
    Ok(())
}

/// Removes the PID file; failures are logged, not returned.
pub(crate) fn remove_pid_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::info!(path = %path.display(), "PID file removed"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove PID file"),
    }
}

/// Refreshes the uptime gauge until `shutdown` is cancelled.
fn spawn_uptime_updater(start_time: Instant, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(UPTIME_REFRESH);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    #[allow(clippy::cast_precision_loss)]
                    metrics::gauge!(m::DAEMON_UPTIME_SECONDS).set(start_time.elapsed().as_secs() as f64);
                }
                _ = shutdown.cancelled() => {
                    tracing::debug!("uptime updater shutting down");
                    break;
                }
            }
        }
    })
}
