//! 클라이언트별 스트리밍 세션
//!
//! [`StreamSession`]은 [`Subscription`] 하나를 소유하고, 이를 스트리밍
//! 클라이언트가 보는 이벤트 시퀀스로 바꿉니다:
//!
//! ```text
//! Connecting --next_event--> Streaming --(shutdown | evicted | close)--> Closed
//!               (hello)        (events, heartbeats)
//! ```
//!
//! 스트리밍 중에는 이벤트를 최대 `poll_timeout`만큼 기다립니다.
//! 대기가 만료될 때마다 하트비트 시계를 확인하고, 마지막 하트비트 이후
//! `heartbeat_interval`이 지났으면 하트비트를 내보냅니다. 경계는
//! 포함입니다: poll 5초, 간격 15초이면 하트비트는 네 번째가 아니라
//! 세 번째 만료에 나갑니다.

use std::time::Duration;

use metrics::{counter, gauge};
use tokio::time::{Instant, timeout};
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use apkwatch_core::config::StreamConfig;
use apkwatch_core::event::StreamEvent;
use apkwatch_core::metrics as m;

use crate::bus::{EventBus, Subscription, SubscriptionId};

/// 세션 타이밍 파라미터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// 이벤트 한 번 대기의 상한
    pub poll_timeout: Duration,
    /// 하트비트 사이의 최소 간격
    pub heartbeat_interval: Duration,
}

impl SessionConfig {
    pub fn from_core(config: &StreamConfig) -> Self {
        Self {
            poll_timeout: config.poll_timeout(),
            heartbeat_interval: config.heartbeat_interval(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_core(&StreamConfig::default())
    }
}

/// 세션 생명주기 (`Closed`는 종료 상태)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Streaming,
    Closed,
}

/// 세션이 이벤트 생성을 멈춘 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// 프로세스 종료 중
    Shutdown,
    /// 버스가 이 구독자를 제거함 (채널 가득 참)
    Evicted,
    /// `close()`가 호출되었거나 세션이 drop됨
    Closed,
}

/// 아웃바운드 이벤트 스트림 하나
pub struct StreamSession {
    bus: EventBus,
    subscription: Option<Subscription>,
    id: SubscriptionId,
    config: SessionConfig,
    shutdown: CancellationToken,
    state: SessionState,
    last_heartbeat: Instant,
    close_reason: Option<CloseReason>,
}

impl StreamSession {
    /// `bus`를 구독하고 `Connecting` 상태의 세션을 반환합니다.
    pub fn open(bus: &EventBus, config: SessionConfig, shutdown: CancellationToken) -> Self {
        let subscription = bus.subscribe();
        let id = subscription.id();
        gauge!(m::STREAM_ACTIVE_SESSIONS).increment(1.0);
        info!(session = %id, "stream session opened");

        Self {
            bus: bus.clone(),
            subscription: Some(subscription),
            id,
            config,
            shutdown,
            state: SessionState::Connecting,
            last_heartbeat: Instant::now(),
            close_reason: None,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 세션이 `Closed`가 되면 설정됩니다.
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason
    }

    /// 클라이언트에게 보낼 다음 이벤트. 세션이 닫히면 `None`.
    ///
    /// 첫 호출은 `hello`를 반환합니다. 이후에는 버스 이벤트를 그대로,
    /// 유휴 스트림에서는 하트비트를 반환합니다.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        match self.state {
            SessionState::Closed => return None,
            SessionState::Connecting => {
                self.state = SessionState::Streaming;
                self.last_heartbeat = Instant::now();
                debug!(session = %self.id, "stream ready");
                return Some(StreamEvent::hello());
            }
            SessionState::Streaming => {}
        }

        loop {
            let Some(subscription) = self.subscription.as_mut() else {
                self.close_with(CloseReason::Closed);
                return None;
            };

            let shutdown = self.shutdown.clone();
            let waited = tokio::select! {
                biased;
                () = shutdown.cancelled() => None,
                received = timeout(self.config.poll_timeout, subscription.recv()) => Some(received),
            };

            match waited {
                None => {
                    self.close_with(CloseReason::Shutdown);
                    return None;
                }
                Some(Ok(Some(event))) => return Some(event),
                Some(Ok(None)) => {
                    self.close_with(CloseReason::Evicted);
                    return None;
                }
                Some(Err(_elapsed)) => {
                    if self.last_heartbeat.elapsed() >= self.config.heartbeat_interval {
                        self.last_heartbeat = Instant::now();
                        counter!(m::STREAM_HEARTBEATS_TOTAL).increment(1);
                        return Some(StreamEvent::heartbeat());
                    }
                }
            }
        }
    }

    /// 세션을 닫고 구독을 해제합니다. 다시 호출해도 효과가 없습니다.
    pub fn close(&mut self) {
        self.close_with(CloseReason::Closed);
    }

    fn close_with(&mut self, reason: CloseReason) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;
        self.close_reason = Some(reason);

        if let Some(subscription) = self.subscription.take() {
            self.bus.unsubscribe(subscription.id());
        }
        gauge!(m::STREAM_ACTIVE_SESSIONS).decrement(1.0);
        info!(session = %self.id, reason = ?reason, "stream session closed");
    }

    /// 세션이 닫히면 끝나는 스트림으로 변환합니다.
    ///
    /// 스트림을 drop하면 세션이 닫힙니다.
    pub fn into_stream(mut self) -> impl Stream<Item = StreamEvent> + Send + 'static {
        async_stream::stream! {
            while let Some(event) = self.next_event().await {
                yield event;
            }
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
