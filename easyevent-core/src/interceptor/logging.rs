use super::{InterceptorContext, PublisherInterceptor};
use crate::error::EventError;
use crate::event::Event;
use std::time::Instant;
use tracing::{debug, warn};

/// 内置日志拦截器：从不否决，记录每次发布的耗时与结果
///
/// 放行阶段在上下文中写入开始时刻，完成阶段据此计算耗时；
/// 若开始时刻缺失（例如注册在否决者之后），退回到上下文的创建时刻。
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingInterceptor;

impl LoggingInterceptor {
    /// 上下文属性键：发布开始时刻（`Instant`）
    pub const STARTED_AT: &'static str = "easyevent.publish.started_at";
}

impl PublisherInterceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        "logging"
    }

    fn pre_publish(&self, _event: &Event, ctx: &mut InterceptorContext) -> bool {
        // 批量发布共享上下文，只记录第一条事件的开始时刻
        if !ctx.contains_attribute(Self::STARTED_AT) {
            ctx.set_attribute(Self::STARTED_AT, Instant::now());
        }
        true
    }

    fn after_completion(
        &self,
        event: &Event,
        ctx: &InterceptorContext,
        error: Option<&EventError>,
    ) -> anyhow::Result<()> {
        let started_at = ctx
            .attribute::<Instant>(Self::STARTED_AT)
            .copied()
            .unwrap_or_else(|| ctx.created_at());
        let elapsed_ms = started_at.elapsed().as_millis();

        match error {
            None => debug!(
                event_type = event.type_name(),
                context_id = %ctx.context_id(),
                elapsed_ms,
                "event published"
            ),
            Some(err) => warn!(
                event_type = event.type_name(),
                context_id = %ctx.context_id(),
                elapsed_ms,
                error = %err,
                "event publish failed"
            ),
        }
        Ok(())
    }
}
