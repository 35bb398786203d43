//! 内存版事件总线（InMemoryEventBus）
//!
//! 以事件的具体类型（`TypeId`）为键注册处理器，满足 `EventBus` 协议：
//! - 同一类型可注册多个处理器，`post` 按注册顺序依次调用；
//! - 某个处理器失败不会阻止后续处理器执行，失败原因汇总到调度结果中；
//! - 没有匹配处理器的事件视为成功（调用数为 0），仅记录调试日志。
//!
use super::{DispatchInvokeResult, EventBus, EventHandler, HandlerFailure};
use crate::error::EventError;
use crate::event::Event;
use async_trait::async_trait;
use dashmap::DashMap;
use std::any::{TypeId, type_name};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// 类型擦除后的处理器，调用时再还原具体事件类型
#[async_trait]
trait ErasedHandler: Send + Sync {
    fn handler_name(&self) -> &str;
    async fn handle(&self, event: &Event) -> anyhow::Result<()>;
}

struct TypedHandler<E, H> {
    inner: Arc<H>,
    _event: PhantomData<fn(&E)>,
}

#[async_trait]
impl<E, H> ErasedHandler for TypedHandler<E, H>
where
    E: Send + Sync + 'static,
    H: EventHandler<E> + 'static,
{
    fn handler_name(&self) -> &str {
        self.inner.handler_name()
    }

    async fn handle(&self, event: &Event) -> anyhow::Result<()> {
        // 正常情况下这里的 downcast 永远不会失败（键与包装器同一泛型 E）
        let Some(payload) = event.downcast_ref::<E>() else {
            return Err(EventError::TypeMismatch {
                expected: type_name::<E>(),
                found: event.type_name(),
            }
            .into());
        };
        self.inner.handle(payload).await
    }
}

type HandlerList = Vec<Arc<dyn ErasedHandler>>;

/// 基于内存的 EventBus 实现
#[derive(Default)]
pub struct InMemoryEventBus {
    handlers: DashMap<TypeId, (&'static str, HandlerList)>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为事件类型 `E` 追加一个处理器
    pub fn register<E, H>(&self, handler: Arc<H>)
    where
        E: Send + Sync + 'static,
        H: EventHandler<E> + 'static,
    {
        let erased: Arc<dyn ErasedHandler> = Arc::new(TypedHandler::<E, H> {
            inner: handler,
            _event: PhantomData,
        });
        self.handlers
            .entry(TypeId::of::<E>())
            .or_insert_with(|| (type_name::<E>(), Vec::new()))
            .1
            .push(erased);
    }

    pub fn handler_count<E: 'static>(&self) -> usize {
        self.handlers
            .get(&TypeId::of::<E>())
            .map(|entry| entry.1.len())
            .unwrap_or(0)
    }

    /// 获取已注册的事件类型名列表（只读视图）
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().0).collect()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn post(&self, event: &Event) -> DispatchInvokeResult {
        // 先复制出处理器列表，避免跨 await 持有 DashMap 的读锁
        let Some(handlers) = self
            .handlers
            .get(&event.type_id())
            .map(|entry| entry.1.clone())
        else {
            debug!(event_type = event.type_name(), "no handler registered, dead event");
            return DispatchInvokeResult::success(event.type_name(), 0);
        };

        let mut failures = Vec::new();
        for handler in &handlers {
            if let Err(err) = handler.handle(event).await {
                debug!(
                    handler = handler.handler_name(),
                    event_type = event.type_name(),
                    error = %err,
                    "event handler failed"
                );
                failures.push(HandlerFailure {
                    handler: handler.handler_name().to_string(),
                    reason: err.to_string(),
                });
            }
        }

        if failures.is_empty() {
            DispatchInvokeResult::success(event.type_name(), handlers.len())
        } else {
            DispatchInvokeResult::failure(event.type_name(), handlers.len(), failures)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::task::JoinSet;

    #[derive(Debug)]
    struct Deposited {
        amount: i64,
    }

    struct Ledger {
        name: &'static str,
        fail: bool,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl EventHandler<Deposited> for Ledger {
        fn handler_name(&self) -> &str {
            self.name
        }

        async fn handle(&self, event: &Deposited) -> anyhow::Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, event.amount));
            if self.fail {
                anyhow::bail!("ledger locked");
            }
            Ok(())
        }
    }

    fn ledger(name: &'static str, fail: bool, seen: &Arc<Mutex<Vec<String>>>) -> Arc<Ledger> {
        Arc::new(Ledger {
            name,
            fail,
            seen: seen.clone(),
        })
    }

    #[tokio::test]
    async fn post_runs_handlers_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let bus = InMemoryEventBus::new();
        bus.register::<Deposited, _>(ledger("first", false, &seen));
        bus.register::<Deposited, _>(ledger("second", false, &seen));
        assert_eq!(bus.handler_count::<Deposited>(), 2);
        assert_eq!(bus.registered_types().len(), 1);

        let result = bus.post(&Event::new(Deposited { amount: 5 })).await;
        assert!(result.is_success());
        assert_eq!(result.invoked(), 2);
        assert_eq!(*seen.lock().unwrap(), vec!["first:5", "second:5"]);
    }

    #[tokio::test]
    async fn failing_handler_does_not_stop_the_rest() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let bus = InMemoryEventBus::new();
        bus.register::<Deposited, _>(ledger("broken", true, &seen));
        bus.register::<Deposited, _>(ledger("ok", false, &seen));

        let result = bus.post(&Event::new(Deposited { amount: 1 })).await;
        assert!(!result.is_success());
        assert_eq!(result.invoked(), 2);
        assert_eq!(
            result.failures(),
            &[HandlerFailure {
                handler: "broken".into(),
                reason: "ledger locked".into(),
            }]
        );
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unhandled_event_is_a_successful_noop() {
        let bus = InMemoryEventBus::new();
        assert_eq!(bus.handler_count::<Deposited>(), 0);

        let result = bus.post(&Event::new("nobody listens")).await;
        assert!(result.is_success());
        assert_eq!(result.invoked(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_post_is_safe() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let bus = Arc::new(InMemoryEventBus::new());
        bus.register::<Deposited, _>(ledger("l", false, &seen));

        let mut set = JoinSet::new();
        for amount in 0..50 {
            let bus = bus.clone();
            set.spawn(async move { bus.post(&Event::new(Deposited { amount })).await });
        }
        while let Some(res) = set.join_next().await {
            assert!(res.unwrap().is_success());
        }
        assert_eq!(seen.lock().unwrap().len(), 50);
    }
}
