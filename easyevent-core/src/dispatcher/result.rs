use crate::error::EventError;

/// 单个处理器的失败记录
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerFailure {
    pub handler: String,
    pub reason: String,
}

/// 进程内调度结果：由调用方持有，不被保留
#[derive(Clone, Debug)]
pub struct DispatchInvokeResult {
    success: bool,
    event_type: &'static str,
    /// 实际调用的处理器数量
    invoked: usize,
    failures: Vec<HandlerFailure>,
}

impl DispatchInvokeResult {
    pub fn success(event_type: &'static str, invoked: usize) -> Self {
        Self {
            success: true,
            event_type,
            invoked,
            failures: Vec::new(),
        }
    }

    pub fn failure(
        event_type: &'static str,
        invoked: usize,
        failures: Vec<HandlerFailure>,
    ) -> Self {
        Self {
            success: false,
            event_type,
            invoked,
            failures,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn event_type(&self) -> &'static str {
        self.event_type
    }

    pub fn invoked(&self) -> usize {
        self.invoked
    }

    pub fn failures(&self) -> &[HandlerFailure] {
        &self.failures
    }

    /// 失败时转换为 `EventError::Dispatch`，汇总所有处理器的失败原因
    pub fn to_error(&self) -> Option<EventError> {
        if self.success {
            return None;
        }
        let reason = if self.failures.is_empty() {
            "dispatch reported failure".to_string()
        } else {
            self.failures
                .iter()
                .map(|f| format!("{}: {}", f.handler, f.reason))
                .collect::<Vec<_>>()
                .join("; ")
        };
        Some(EventError::Dispatch {
            event_type: self.event_type.to_string(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_has_no_error() {
        let result = DispatchInvokeResult::success("Ping", 2);
        assert!(result.is_success());
        assert_eq!(result.invoked(), 2);
        assert!(result.to_error().is_none());
    }

    #[test]
    fn failure_error_lists_every_handler() {
        let result = DispatchInvokeResult::failure(
            "Ping",
            3,
            vec![
                HandlerFailure {
                    handler: "audit".into(),
                    reason: "disk full".into(),
                },
                HandlerFailure {
                    handler: "mail".into(),
                    reason: "smtp down".into(),
                },
            ],
        );

        match result.to_error() {
            Some(EventError::Dispatch { event_type, reason }) => {
                assert_eq!(event_type, "Ping");
                assert_eq!(reason, "audit: disk full; mail: smtp down");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
