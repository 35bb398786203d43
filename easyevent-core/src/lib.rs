//! easyevent 发布侧核心库（easyevent-core）
//!
//! 负责一次事件发布从“拦截放行”到“投递”再到“完成通知”的完整流水线：
//! - 事件模型（`event`）：类型擦除的事件载荷；
//! - 拦截器（`interceptor`）：有序的放行/观察链与单次发布的上下文；
//! - 调度（`dispatcher`）：进程内同步投递的总线协议、处理器与调度结果；
//! - 传输（`transfer`）：基于外部通道的异步发送协议与本地实现；
//! - 执行器（`executor`）：带链路追踪传递的有界工作池；
//! - 发布器（`publisher`）：同步 / 异步 / 批量三种发布模式的编排。
//!
//! 典型用法：
//! 1. 构建 `TraceExecutor`，并据此构建 `EventBus` 与 `EventSender` 实现；
//! 2. 准备若干 `PublisherInterceptor`（按注册顺序生效）；
//! 3. 通过 `DefaultEventPublisher::builder()` 组装发布器；
//! 4. 调用 `sync_publish` / `async_publish` / `async_publish_list` 发布事件。
//!
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod executor;
pub mod interceptor;
pub mod publisher;
pub mod transfer;

pub use error::{EventError, EventResult};
pub use event::Event;
