//! Launches an orchestrator on an ephemeral port.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use apkwatch_core::config::ApkwatchConfig;
use apkwatch_daemon::orchestrator::Orchestrator;
use apkwatch_event_bus::EventBus;

/// Upper bound for a daemon to finish after cancellation.
#[allow(dead_code)]
pub const STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[allow(dead_code)]
pub struct RunningDaemon {
    pub addr: SocketAddr,
    pub bus: EventBus,
    pub token: CancellationToken,
    pub handle: JoinHandle<Result<()>>,
}

#[allow(dead_code)]
impl RunningDaemon {
    /// Cancels the daemon and waits for `serve_on` to return.
    pub async fn stop(self) -> Result<()> {
        self.token.cancel();
        tokio::time::timeout(STOP_TIMEOUT, self.handle)
            .await
            .expect("daemon did not stop in time")
            .expect("daemon task panicked")
    }
}

/// Builds the orchestrator and serves it on `127.0.0.1:0`.
pub async fn spawn_daemon(config: ApkwatchConfig) -> RunningDaemon {
    let mut orchestrator = Orchestrator::build_from_config(config)
        .await
        .expect("orchestrator should build");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let bus = orchestrator.bus().clone();
    let token = orchestrator.shutdown_token();

    let handle = tokio::spawn(async move { orchestrator.serve_on(listener).await });

    RunningDaemon {
        addr,
        bus,
        token,
        handle,
    }
}
