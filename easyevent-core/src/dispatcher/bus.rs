//! 事件总线（EventBus）协议
//!
//! 进程内同步投递：调用返回即代表所有匹配的处理器已执行完毕。
//! 投递失败通过 `DispatchInvokeResult` 表达，而不是返回错误。
//!
use super::DispatchInvokeResult;
use crate::event::Event;
use async_trait::async_trait;

/// 事件总线：将事件分发给进程内的处理器
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn post(&self, event: &Event) -> DispatchInvokeResult;
}
