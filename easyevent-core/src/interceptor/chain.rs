use super::{InterceptorContext, PublisherInterceptor};
use crate::error::EventError;
use crate::event::Event;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 拦截器链：按注册顺序组合的拦截器集合
///
/// - 放行判断为“一票否决”：任一拦截器否决即短路返回 `false`；
/// - 完成通知对每个拦截器逐一调用，单个观察者返回错误或 panic 都只被记录，不会阻断后续观察者；
/// - 注册集合在构造后只读，发布期间不可变更。
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn PublisherInterceptor>>,
}

impl InterceptorChain {
    pub fn new(interceptors: Vec<Arc<dyn PublisherInterceptor>>) -> Self {
        Self { interceptors }
    }

    /// 按注册顺序执行放行判断
    pub fn apply_pre_publish(&self, event: &Event, ctx: &mut InterceptorContext) -> bool {
        for interceptor in &self.interceptors {
            if !interceptor.pre_publish(event, ctx) {
                debug!(
                    interceptor = interceptor.name(),
                    event_type = event.type_name(),
                    context_id = %ctx.context_id(),
                    "event vetoed"
                );
                return false;
            }
        }
        true
    }

    /// 按注册顺序触发完成通知，所有观察者收到同一上下文与同一错误
    pub fn trigger_after_completion(
        &self,
        event: &Event,
        ctx: &InterceptorContext,
        error: Option<&EventError>,
    ) {
        for interceptor in &self.interceptors {
            let outcome =
                catch_unwind(AssertUnwindSafe(|| interceptor.after_completion(event, ctx, error)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    interceptor = interceptor.name(),
                    event_type = event.type_name(),
                    context_id = %ctx.context_id(),
                    error = %err,
                    "after_completion failed"
                ),
                Err(_) => error!(
                    interceptor = interceptor.name(),
                    event_type = event.type_name(),
                    context_id = %ctx.context_id(),
                    "after_completion panicked"
                ),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// 已注册拦截器名称（注册顺序）
    pub fn names(&self) -> Vec<&str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }
}

impl From<Vec<Arc<dyn PublisherInterceptor>>> for InterceptorChain {
    fn from(interceptors: Vec<Arc<dyn PublisherInterceptor>>) -> Self {
        Self::new(interceptors)
    }
}
