//! 本地事件发送器（LocalEventSender）
//!
//! 不经过外部中间件的 `EventSender` 实现：把事件交给 `TraceExecutor`，
//! 由工作任务投递到进程内的 `EventBus`。
//! - `send`：一条事件一个任务，多条 `send` 之间不保证顺序；
//! - `send_list`：整批一个任务，按原顺序依次投递；
//! - 交付到执行器即返回 `Ok(true)`，投递失败只记录日志；
//! - 执行器优雅关闭（`shutdown`）时，已交付的事件仍会被投递。
//!
use crate::dispatcher::EventBus;
use crate::error::EventResult;
use crate::event::Event;
use crate::executor::TraceExecutor;
use crate::transfer::EventSender;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct LocalEventSender {
    bus: Arc<dyn EventBus>,
    executor: Arc<TraceExecutor>,
}

impl LocalEventSender {
    pub fn new(bus: Arc<dyn EventBus>, executor: Arc<TraceExecutor>) -> Self {
        Self { bus, executor }
    }

    async fn deliver(bus: &Arc<dyn EventBus>, event: &Event) {
        let result = bus.post(event).await;
        if let Some(err) = result.to_error() {
            warn!(event_type = event.type_name(), error = %err, "local delivery failed");
        }
    }
}

#[async_trait]
impl EventSender for LocalEventSender {
    async fn send(&self, event: &Event) -> EventResult<bool> {
        let bus = self.bus.clone();
        let event = event.clone();
        self.executor
            .execute(async move { Self::deliver(&bus, &event).await })
            .await?;
        Ok(true)
    }

    async fn send_list(&self, events: &[Event]) -> EventResult<bool> {
        let bus = self.bus.clone();
        let events = events.to_vec();
        self.executor
            .execute(async move {
                for event in &events {
                    Self::deliver(&bus, event).await;
                }
            })
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{EventHandler, InMemoryEventBus};
    use crate::error::EventError;
    use crate::executor::ExecutorConfig;
    use std::sync::Mutex;
    use std::time::Duration;

    struct Collect {
        seen: Arc<Mutex<Vec<u32>>>,
    }

    #[async_trait]
    impl EventHandler<u32> for Collect {
        fn handler_name(&self) -> &str {
            "collect"
        }

        async fn handle(&self, event: &u32) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(*event);
            Ok(())
        }
    }

    fn setup() -> (LocalEventSender, Arc<TraceExecutor>, Arc<Mutex<Vec<u32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let bus = Arc::new(InMemoryEventBus::new());
        bus.register::<u32, _>(Arc::new(Collect { seen: seen.clone() }));
        let executor = Arc::new(TraceExecutor::new(ExecutorConfig::default()).unwrap());
        (LocalEventSender::new(bus, executor.clone()), executor, seen)
    }

    async fn wait_for(seen: &Arc<Mutex<Vec<u32>>>, n: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while seen.lock().unwrap().len() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn send_delivers_through_executor() {
        let (sender, _executor, seen) = setup();

        assert!(sender.send(&Event::new(7_u32)).await.unwrap());
        wait_for(&seen, 1).await;
        assert_eq!(*seen.lock().unwrap(), vec![7]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn send_list_preserves_order() {
        let (sender, _executor, seen) = setup();
        let events: Vec<Event> = (1..=20_u32).map(Event::new).collect();

        assert!(sender.send_list(&events).await.unwrap());
        wait_for(&seen, 20).await;
        assert_eq!(*seen.lock().unwrap(), (1..=20).collect::<Vec<_>>());
    }

    struct SlowCollect {
        seen: Arc<Mutex<Vec<u64>>>,
    }

    #[async_trait]
    impl EventHandler<u64> for SlowCollect {
        fn handler_name(&self) -> &str {
            "slow-collect"
        }

        async fn handle(&self, event: &u64) -> anyhow::Result<()> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.seen.lock().unwrap().push(*event);
            Ok(())
        }
    }

    #[tokio::test]
    async fn acknowledged_sends_are_delivered_after_shutdown() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let bus = Arc::new(InMemoryEventBus::new());
        bus.register::<u64, _>(Arc::new(SlowCollect { seen: seen.clone() }));
        let executor = Arc::new(
            TraceExecutor::new(ExecutorConfig {
                workers: 1,
                queue_capacity: 8,
            })
            .unwrap(),
        );
        let sender = LocalEventSender::new(bus, executor.clone());

        for n in 1..=4_u64 {
            assert!(sender.send(&Event::new(n)).await.unwrap());
        }
        executor.shutdown().await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn handoff_failure_is_raised() {
        let (sender, executor, _seen) = setup();
        executor.shutdown().await;

        let err = sender.send(&Event::new(1_u32)).await.unwrap_err();
        assert!(matches!(err, EventError::ExecutorShutdown));
        let err = sender.send_list(&[Event::new(2_u32)]).await.unwrap_err();
        assert!(matches!(err, EventError::ExecutorShutdown));
    }
}
