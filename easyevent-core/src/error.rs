//! 发布侧统一错误定义
//!
//! 覆盖传输、调度、执行器与配置等最小必要集合。
//! 注意：拦截器否决（veto）不是错误，不在此列。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EventError {
    // --- 传输 ---
    #[error("transport error: {reason}")]
    Transport { reason: String },
    #[error("send timeout: {reason}")]
    Timeout { reason: String },

    // --- 进程内调度 ---
    #[error("dispatch failed: type={event_type}, reason={reason}")]
    Dispatch { event_type: String, reason: String },
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    // --- 执行器 ---
    #[error("executor has been shut down")]
    ExecutorShutdown,
    #[error("executor queue is full: capacity={capacity}")]
    ExecutorSaturated { capacity: usize },

    // --- 配置 ---
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}

impl EventError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn timeout(reason: impl Into<String>) -> Self {
        Self::Timeout {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type EventResult<T> = Result<T, EventError>;
