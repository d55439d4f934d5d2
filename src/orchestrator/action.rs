//! 动作定义与面向用户的通知

/// 命令行可执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 送签
    Submit,
    /// 完成
    Complete,
    /// 取消
    Cancel,
    /// 撤销签核
    CancelSign,
    /// 回到草稿
    BackToDraft,
    /// 撤回签核
    BackToApproved,
    /// 更新签核历程
    RefreshHistory,
    /// 更新 EFGP 状态
    RefreshStatus,
    /// 测试 EFGP 连线
    TestConnection,
}

impl Action {
    /// 从命令行参数解析动作
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "submit" => Some(Action::Submit),
            "complete" => Some(Action::Complete),
            "cancel" => Some(Action::Cancel),
            "cancel-sign" => Some(Action::CancelSign),
            "back-to-draft" => Some(Action::BackToDraft),
            "back-to-approved" => Some(Action::BackToApproved),
            "refresh-history" => Some(Action::RefreshHistory),
            "refresh-status" => Some(Action::RefreshStatus),
            "test-connection" => Some(Action::TestConnection),
            _ => None,
        }
    }

    /// 动作代码
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Submit => "submit",
            Action::Complete => "complete",
            Action::Cancel => "cancel",
            Action::CancelSign => "cancel-sign",
            Action::BackToDraft => "back-to-draft",
            Action::BackToApproved => "back-to-approved",
            Action::RefreshHistory => "refresh-history",
            Action::RefreshStatus => "refresh-status",
            Action::TestConnection => "test-connection",
        }
    }

    /// 是否需要调用远端服务
    pub fn needs_remote(self) -> bool {
        matches!(
            self,
            Action::Submit | Action::RefreshHistory | Action::RefreshStatus
        )
    }

    /// 是否需要申请单参数
    pub fn needs_record(self) -> bool {
        !matches!(self, Action::TestConnection)
    }

    /// 全部动作，用于使用说明
    pub fn all() -> &'static [Action] {
        &[
            Action::Submit,
            Action::Complete,
            Action::Cancel,
            Action::CancelSign,
            Action::BackToDraft,
            Action::BackToApproved,
            Action::RefreshHistory,
            Action::RefreshStatus,
            Action::TestConnection,
        ]
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 面向用户的通知
///
/// 所有动作的出口：标题 + 纯文本信息，从不外露原始异常。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}
