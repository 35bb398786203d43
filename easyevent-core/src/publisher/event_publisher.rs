use crate::error::EventResult;
use crate::event::Event;
use async_trait::async_trait;

/// 事件发布器（Event Publisher）
///
/// 三种发布模式共享同一套“放行 → 投递 → 完成通知”的顺序保证：
/// - `sync_publish`：经 `EventBus` 在进程内同步投递，调度失败以 `false` 表示；
/// - `async_publish`：经 `EventSender` 交付传输层，传输失败通知拦截器后原样返回；
/// - `async_publish_list`：整批共享一个拦截上下文，批量失败统一通知给每条未被否决的事件。
///
/// 被拦截器否决的事件视为成功的空操作，三种模式均返回 `true`。
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn sync_publish(&self, event: Event) -> bool;

    async fn async_publish(&self, event: Event) -> EventResult<bool>;

    async fn async_publish_list(&self, events: Vec<Event>) -> EventResult<bool>;
}
