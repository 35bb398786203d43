//! 事件传输（transfer）
//!
//! `EventSender` 定义交付给外部传输通道的协议；`LocalEventSender` 是
//! 借助执行器在进程内完成投递的参考实现。
//!
pub mod sender;
pub mod sender_local;

pub use sender::EventSender;
pub use sender_local::LocalEventSender;
