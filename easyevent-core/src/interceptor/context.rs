use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use ulid::Ulid;

/// 发布拦截上下文（Interceptor Context）
///
/// 一次发布操作独占的可变属性袋：由发布器在放行判断前创建，按引用传给
/// 放行与完成回调，调用返回后即丢弃。批量发布时整批事件共享同一实例，
/// 因此拦截某条事件时写入的属性，在拦截下一条事件时可见。
///
/// 典型用法：
/// ```rust
/// use easyevent_core::interceptor::InterceptorContext;
///
/// let mut ctx = InterceptorContext::new();
/// ctx.set_attribute("tenant", "acme".to_string());
/// assert_eq!(ctx.attribute::<String>("tenant").map(String::as_str), Some("acme"));
/// assert!(ctx.attribute::<u64>("tenant").is_none());
/// ```
pub struct InterceptorContext {
    /// 本次发布的唯一标识，可作为关联ID使用
    context_id: Ulid,
    /// 上下文创建时刻
    created_at: Instant,
    attributes: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl InterceptorContext {
    pub fn new() -> Self {
        Self {
            context_id: Ulid::new(),
            created_at: Instant::now(),
            attributes: HashMap::new(),
        }
    }

    pub fn context_id(&self) -> Ulid {
        self.context_id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn elapsed(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// 写入属性，返回是否覆盖了已有值
    pub fn set_attribute<T>(&mut self, key: impl Into<String>, value: T) -> bool
    where
        T: Any + Send + Sync,
    {
        self.attributes.insert(key.into(), Box::new(value)).is_some()
    }

    /// 读取属性；键不存在或类型不符时返回 `None`
    pub fn attribute<T: Any>(&self, key: &str) -> Option<&T> {
        self.attributes.get(key)?.downcast_ref::<T>()
    }

    pub fn contains_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn remove_attribute(&mut self, key: &str) -> bool {
        self.attributes.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Default for InterceptorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InterceptorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("InterceptorContext")
            .field("context_id", &self.context_id)
            .field("attributes", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_typed() {
        let mut ctx = InterceptorContext::new();
        assert!(ctx.is_empty());

        assert!(!ctx.set_attribute("retries", 3_u32));
        assert_eq!(ctx.attribute::<u32>("retries"), Some(&3));
        assert!(ctx.attribute::<i64>("retries").is_none());
        assert!(ctx.attribute::<u32>("missing").is_none());

        // 覆盖写入
        assert!(ctx.set_attribute("retries", 4_u32));
        assert_eq!(ctx.attribute::<u32>("retries"), Some(&4));
        assert_eq!(ctx.len(), 1);

        assert!(ctx.remove_attribute("retries"));
        assert!(!ctx.remove_attribute("retries"));
        assert!(!ctx.contains_attribute("retries"));
    }

    #[test]
    fn every_context_has_its_own_id() {
        let a = InterceptorContext::new();
        let b = InterceptorContext::default();
        assert_ne!(a.context_id(), b.context_id());
        assert!(a.elapsed() >= Duration::ZERO);
    }
}
