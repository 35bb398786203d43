use super::InterceptorContext;
use crate::error::EventError;
use crate::event::Event;

/// 发布拦截器：放行判断（gate）与完成观察（observe）两项能力
///
/// 两个方法都有默认实现，实现方只需覆盖关心的一侧。
pub trait PublisherInterceptor: Send + Sync {
    /// 拦截器名称（用于日志与诊断）
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// 发布前判断：返回 `false` 表示否决，事件将被静默跳过
    fn pre_publish(&self, _event: &Event, _ctx: &mut InterceptorContext) -> bool {
        true
    }

    /// 完成通知：`error` 为 `None` 表示成功；返回的错误只会被记录，不影响发布结果
    fn after_completion(
        &self,
        _event: &Event,
        _ctx: &InterceptorContext,
        _error: Option<&EventError>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}
