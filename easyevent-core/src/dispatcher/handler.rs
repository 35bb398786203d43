use async_trait::async_trait;

/// 事件处理器：处理某一具体类型的事件
#[async_trait]
pub trait EventHandler<E>: Send + Sync
where
    E: Send + Sync + 'static,
{
    /// 处理器名称（用于失败记录与日志）
    fn handler_name(&self) -> &str;
    /// 处理事件
    async fn handle(&self, event: &E) -> anyhow::Result<()>;
}
