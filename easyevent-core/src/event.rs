//! 类型擦除的事件载荷
//!
//! 核心层不对事件施加任何标识或结构约束：任意 `Send + Sync + 'static` 类型
//! 都可以作为事件发布，拦截器与发送器通过运行时类型信息按需还原。
//!
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

/// 事件：共享所有权的类型擦除载荷，克隆开销为一次引用计数
#[derive(Clone)]
pub struct Event {
    payload: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Event {
    pub fn new<T>(payload: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            payload: Arc::new(payload),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// 载荷的具体类型 ID（构造时记录，而非 `Arc` 自身的类型）
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
