//! 事件发布（publisher）
//!
//! - `EventPublisher`：对宿主暴露的同步 / 异步 / 批量发布协议；
//! - `DefaultEventPublisher`：组合总线、发送器、执行器与拦截器链的默认实现；
//! - `PublisherConfig`：发布行为配置（同步完成通知时机等）。
//!
pub mod config;
pub mod default;
pub mod event_publisher;

pub use config::{PublisherConfig, SyncCompletion};
pub use default::DefaultEventPublisher;
pub use event_publisher::EventPublisher;
