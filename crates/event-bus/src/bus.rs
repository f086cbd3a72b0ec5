//! 프로세스 내 이벤트 팬아웃
//!
//! [`EventBus`]는 구독자별 bounded 채널의 레지스트리를 관리합니다. publish는
//! 구독자마다 논블로킹 `try_send`를 한 번 수행하며, 채널이 가득 찼거나
//! 닫힌 구독자는 같은 publish 호출 안에서 제거됩니다.
//!
//! # 채널 구성
//!
//! ```text
//! publish(event) --+--> [cap N] --> Subscription A
//!                  +--> [cap N] --> Subscription B
//!                  +--> [full ] --> evicted, channel closed
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use metrics::{counter, gauge};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tracing::{debug, warn};

use apkwatch_core::config::StreamConfig;
use apkwatch_core::event::{Event, StreamEvent};
use apkwatch_core::metrics as m;

/// 구독자별 기본 채널 용량
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// 구독 하나의 레지스트리 키
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// [`EventBus::publish`] 호출 결과 (참고용)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// 이벤트가 enqueue된 구독자 수
    pub delivered: usize,
    /// 채널이 가득 차거나 닫혀 제거된 구독자 수
    pub dropped: usize,
}

type Registry = HashMap<SubscriptionId, mpsc::Sender<StreamEvent>>;

struct BusInner {
    registry: Mutex<Registry>,
    next_id: AtomicU64,
    capacity: usize,
}

impl BusInner {
    /// 레지스트리 잠금을 획득합니다. 모든 임계 구역이 맵을 일관된 상태로
    /// 남기므로 poison된 잠금은 복구합니다.
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry();
        let removed = registry.remove(&id).is_some();
        if removed {
            record_subscribers(&registry);
        }
        removed
    }
}

/// 레지스트리 크기를 gauge로 기록합니다. 호출자가 레지스트리 잠금을 쥐고 있어
/// gauge 값이 변경 순서와 같은 순서로 기록됩니다.
fn record_subscribers(registry: &Registry) {
    gauge!(m::BUS_SUBSCRIBERS).set(registry.len() as f64);
}

/// 공유 publish/subscribe 핸들
///
/// clone 비용이 작으며, 모든 clone이 하나의 레지스트리를 공유합니다.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// 구독자 채널이 `capacity`개의 이벤트를 담는 버스를 생성합니다.
    ///
    /// 용량 0은 1로 올립니다.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(BusInner {
                registry: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                capacity: capacity.max(1),
            }),
        }
    }

    /// `[stream]` 설정 섹션의 용량으로 버스를 생성합니다.
    pub fn from_config(config: &StreamConfig) -> Self {
        Self::new(config.channel_capacity)
    }

    /// 새 구독자를 등록하고 수신 측을 반환합니다.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.inner.capacity);

        let count = {
            let mut registry = self.inner.registry();
            registry.insert(id, tx);
            record_subscribers(&registry);
            registry.len()
        };
        debug!(subscription = %id, subscribers = count, "subscriber registered");

        Subscription {
            id,
            rx,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// 구독자를 제거합니다. 등록되어 있지 않았으면 `false`를 반환합니다.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.inner.remove(id);
        if removed {
            debug!(subscription = %id, "subscriber removed");
        }
        removed
    }

    /// 모든 구독자에게 블로킹 없이 `event`를 전달합니다.
    ///
    /// 채널이 가득 찼거나 닫힌 구독자는 제거되어 이 이벤트를 받지 못하고,
    /// 나머지는 publish 순서대로 받습니다.
    pub fn publish(&self, event: StreamEvent) -> PublishReport {
        let mut report = PublishReport::default();
        let mut registry = self.inner.registry();

        let mut stale = Vec::new();
        for (id, tx) in registry.iter() {
            match tx.try_send(event.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(subscription = %id, event_id = event.event_id(), "subscriber channel full, evicting");
                    stale.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(subscription = %id, "subscriber channel closed, removing");
                    stale.push(*id);
                }
            }
        }
        for id in &stale {
            registry.remove(id);
        }
        report.dropped = stale.len();
        if report.dropped > 0 {
            record_subscribers(&registry);
        }
        drop(registry);

        counter!(m::BUS_EVENTS_PUBLISHED_TOTAL).increment(1);
        counter!(m::BUS_DELIVERIES_TOTAL).increment(report.delivered as u64);
        if report.dropped > 0 {
            counter!(m::BUS_SUBSCRIBERS_EVICTED_TOTAL).increment(report.dropped as u64);
        }

        debug!(
            event_id = event.event_id(),
            event_type = event.event_type(),
            trace_id = %event.metadata().trace_id,
            delivered = report.delivered,
            dropped = report.dropped,
            "event published"
        );
        report
    }

    /// 등록된 구독자 수
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry().len()
    }

    /// 구독자별 채널 용량
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("capacity", &self.inner.capacity)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// 구독 하나의 수신 측
///
/// drop하면 레지스트리 항목이 제거됩니다.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    rx: mpsc::Receiver<StreamEvent>,
    bus: Weak<BusInner>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// 다음 이벤트를 기다립니다. 버스가 이 구독자를 제거하고 버퍼가
    /// 비워지면 `None`을 반환합니다.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.rx.recv().await
    }

    /// 버퍼에 있는 이벤트를 기다리지 않고 꺼냅니다.
    pub fn try_recv(&mut self) -> Result<StreamEvent, TryRecvError> {
        self.rx.try_recv()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            if inner.remove(self.id) {
                debug!(subscription = %self.id, "subscription dropped");
            }
        }
    }
}
