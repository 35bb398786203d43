//! 默认事件发布器（DefaultEventPublisher）
//!
//! 编排一次发布的完整顺序：创建上下文 → 拦截器放行判断 → 总线投递或发送器交付 →
//! 完成通知。整个过程在调用方任务上顺序执行，发布器自身不派生任何任务；
//! 持有的 `TraceExecutor` 仅作为资源提供给协作方使用。
//!
use super::{EventPublisher, PublisherConfig, SyncCompletion};
use crate::dispatcher::EventBus;
use crate::error::EventResult;
use crate::event::Event;
use crate::executor::TraceExecutor;
use crate::interceptor::{InterceptorChain, InterceptorContext, PublisherInterceptor};
use crate::transfer::EventSender;
use async_trait::async_trait;
use bon::Builder;
use std::sync::Arc;
use tracing::debug;

// 导入由 bon::Builder 生成的 typestate 模块与状态转换别名
use self::default_event_publisher_builder::{IsUnset, SetChain, State as BuilderState};

#[derive(Builder)]
pub struct DefaultEventPublisher {
    event_bus: Arc<dyn EventBus>,
    event_sender: Arc<dyn EventSender>,
    executor: Arc<TraceExecutor>,
    #[builder(default, setters(vis = "pub(crate)"))]
    chain: InterceptorChain,
    #[builder(default)]
    config: PublisherConfig,
}

impl<S: BuilderState> DefaultEventPublisherBuilder<S> {
    /// 按注册顺序设置拦截器；未设置时拦截器链为空
    pub fn interceptors(
        self,
        interceptors: Vec<Arc<dyn PublisherInterceptor>>,
    ) -> DefaultEventPublisherBuilder<SetChain<S>>
    where
        <S as BuilderState>::Chain: IsUnset,
    {
        self.chain(InterceptorChain::new(interceptors))
    }
}

impl DefaultEventPublisher {
    pub fn event_bus(&self) -> &Arc<dyn EventBus> {
        &self.event_bus
    }

    pub fn event_sender(&self) -> &Arc<dyn EventSender> {
        &self.event_sender
    }

    /// 供协作方卸载传输 I/O 的执行器
    pub fn executor(&self) -> &Arc<TraceExecutor> {
        &self.executor
    }

    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }
}

#[async_trait]
impl EventPublisher for DefaultEventPublisher {
    async fn sync_publish(&self, event: Event) -> bool {
        let mut ctx = InterceptorContext::new();
        if !self.chain.apply_pre_publish(&event, &mut ctx) {
            return true;
        }

        let result = match self.config.sync_completion {
            SyncCompletion::BeforeDispatch => {
                self.chain.trigger_after_completion(&event, &ctx, None);
                self.event_bus.post(&event).await
            }
            SyncCompletion::AfterDispatch => {
                let result = self.event_bus.post(&event).await;
                let error = result.to_error();
                self.chain
                    .trigger_after_completion(&event, &ctx, error.as_ref());
                result
            }
        };

        if !result.is_success() {
            debug!(
                event_type = event.type_name(),
                context_id = %ctx.context_id(),
                failures = result.failures().len(),
                "sync dispatch failed"
            );
        }
        result.is_success()
    }

    async fn async_publish(&self, event: Event) -> EventResult<bool> {
        let mut ctx = InterceptorContext::new();
        if !self.chain.apply_pre_publish(&event, &mut ctx) {
            return Ok(true);
        }

        match self.event_sender.send(&event).await {
            Ok(sent) => {
                self.chain.trigger_after_completion(&event, &ctx, None);
                Ok(sent)
            }
            Err(err) => {
                self.chain.trigger_after_completion(&event, &ctx, Some(&err));
                Err(err)
            }
        }
    }

    async fn async_publish_list(&self, events: Vec<Event>) -> EventResult<bool> {
        // 整批共享同一个上下文
        let mut ctx = InterceptorContext::new();
        let filtered: Vec<Event> = events
            .into_iter()
            .filter(|event| self.chain.apply_pre_publish(event, &mut ctx))
            .collect();
        if filtered.is_empty() {
            return Ok(true);
        }

        match self.event_sender.send_list(&filtered).await {
            Ok(sent) => {
                for event in &filtered {
                    self.chain.trigger_after_completion(event, &ctx, None);
                }
                Ok(sent)
            }
            Err(err) => {
                debug!(
                    context_id = %ctx.context_id(),
                    batch = filtered.len(),
                    error = %err,
                    "batch send failed"
                );
                for event in &filtered {
                    self.chain.trigger_after_completion(event, &ctx, Some(&err));
                }
                Err(err)
            }
        }
    }
}
