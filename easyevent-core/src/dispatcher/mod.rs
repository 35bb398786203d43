//! 进程内调度（dispatcher）
//!
//! - `EventBus`：同步进程内投递协议，返回 `DispatchInvokeResult`；
//! - `EventHandler`：按具体事件类型消费事件；
//! - `InMemoryEventBus`：以类型为键的内存实现。
//!
pub mod bus;
pub mod bus_inmemory;
pub mod handler;
pub mod result;

pub use bus::EventBus;
pub use bus_inmemory::InMemoryEventBus;
pub use handler::EventHandler;
pub use result::{DispatchInvokeResult, HandlerFailure};
