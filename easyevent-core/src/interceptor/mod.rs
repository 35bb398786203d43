//! 发布拦截（interceptor）
//!
//! 围绕每一次发布的可插拔放行/观察单元：
//! - `PublisherInterceptor`：放行判断 `pre_publish` 与完成通知 `after_completion`；
//! - `InterceptorChain`：按注册顺序组合拦截器，一票否决并隔离观察者失败；
//! - `InterceptorContext`：单次发布（或单个批次）独占的可变属性袋；
//! - `LoggingInterceptor`：内置的耗时与结果日志。
//!
mod chain;
mod context;
mod logging;
mod publisher_interceptor;

pub use chain::InterceptorChain;
pub use context::InterceptorContext;
pub use logging::LoggingInterceptor;
pub use publisher_interceptor::PublisherInterceptor;
