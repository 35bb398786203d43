use serde::Deserialize;

/// 同步发布时完成通知的触发时机
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncCompletion {
    /// 投递结束后通知，携带总线报告的调度失败（默认）
    #[default]
    AfterDispatch,
    /// 投递前通知且错误恒为空，与早期版本的行为保持一致
    BeforeDispatch,
}

/// 发布器配置
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    pub sync_completion: SyncCompletion,
}
