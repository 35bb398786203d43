//! 事件发送（EventSender）协议
//!
//! 基于外部传输通道（本地队列、消息中间件等）投递事件。
//! 传输失败以错误形式返回；批量发送没有逐条结果通道，失败即整批失败。
//!
use crate::error::EventResult;
use crate::event::Event;
use async_trait::async_trait;

/// 事件发送器：单条或批量交付给传输层
#[async_trait]
pub trait EventSender: Send + Sync {
    async fn send(&self, event: &Event) -> EventResult<bool>;

    /// 默认逐条发送，遇到第一个失败即返回
    async fn send_list(&self, events: &[Event]) -> EventResult<bool> {
        let mut all = true;
        for event in events {
            all &= self.send(event).await?;
        }
        Ok(all)
    }
}
