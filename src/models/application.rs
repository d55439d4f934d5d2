//! 用印申请单数据模型与状态机
//!
//! 状态转移守卫集中在这里：任何守卫违反都返回前置条件错误，
//! 信息原样显示给用户。凡是把状态重置回草稿的转移都会清空
//! EFGP 序号，序号一旦清空签核历程缓存也随之失效。

use crate::error::{AppError, AppResult};
use crate::models::attachment::Attachment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 申请单状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    /// 草稿
    Draft,
    /// 已送签
    Submitted,
    /// 送签退回
    RejectedSubmitted,
    /// 已核准
    Approved,
    /// 已完成
    Completed,
    /// 已取消
    Cancelled,
}

impl ApplicationState {
    /// 获取状态代码
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationState::Draft => "draft",
            ApplicationState::Submitted => "submitted",
            ApplicationState::RejectedSubmitted => "rejected_submitted",
            ApplicationState::Approved => "approved",
            ApplicationState::Completed => "completed",
            ApplicationState::Cancelled => "cancelled",
        }
    }

    /// 获取显示名称
    pub fn label(self) -> &'static str {
        match self {
            ApplicationState::Draft => "草稿",
            ApplicationState::Submitted => "已送签",
            ApplicationState::RejectedSubmitted => "送签退回",
            ApplicationState::Approved => "已核准",
            ApplicationState::Completed => "已完成",
            ApplicationState::Cancelled => "已取消",
        }
    }

    /// 从代码解析状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ApplicationState::Draft),
            "submitted" => Some(ApplicationState::Submitted),
            "rejected_submitted" => Some(ApplicationState::RejectedSubmitted),
            "approved" => Some(ApplicationState::Approved),
            "completed" => Some(ApplicationState::Completed),
            "cancelled" => Some(ApplicationState::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_state() -> ApplicationState {
    ApplicationState::Draft
}

/// 签核历程行
///
/// 远端流程轨迹的镜像缓存，每次同步整批替换，从不增量修补。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 关卡名称
    pub activity: String,
    /// 状态显示名
    pub state: String,
    /// 签核人
    pub signer: String,
    /// 签核时间（远端格式化字符串，不做解析）
    pub time: String,
    /// 意见
    pub comment: String,
}

/// 用印申请单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampApplication {
    /// 申请单号
    pub name: String,
    /// 申请日期
    pub date: NaiveDate,
    /// 申请人
    pub applicant: String,
    /// 文件名称
    pub document_name: String,
    /// 申请原因
    #[serde(default)]
    pub description: String,
    /// EFGP 系统回传的序号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efgp_serial_no: Option<String>,
    /// 状态
    #[serde(default = "default_state")]
    pub state: ApplicationState,
    /// 附件（外部持有，本系统只读）
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// 签核历程缓存
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl StampApplication {
    /// 送签主题
    pub fn subject(&self) -> String {
        format!("用印申请 - {}", self.document_name)
    }

    /// 送签前置检查：仅草稿可送签，且必须有文件名称
    pub fn ensure_can_submit(&self) -> AppResult<()> {
        if self.state != ApplicationState::Draft {
            return Err(AppError::precondition("仅草稿状态可送签"));
        }
        if self.document_name.trim().is_empty() {
            return Err(AppError::precondition("请填写文件名称"));
        }
        Ok(())
    }

    /// 送签成功后写入状态与序号
    ///
    /// 写入前再查一次草稿守卫，等价于以当前状态为键的条件更新，
    /// 两次并发送签只有一次能通过。
    pub fn mark_submitted(&mut self, serial_no: Option<String>) -> AppResult<()> {
        if self.state != ApplicationState::Draft {
            return Err(AppError::precondition("仅草稿状态可送签"));
        }
        self.state = ApplicationState::Submitted;
        self.efgp_serial_no = serial_no;
        Ok(())
    }

    /// 完成：仅已核准状态可完成
    pub fn complete(&mut self) -> AppResult<()> {
        if self.state != ApplicationState::Approved {
            return Err(AppError::precondition("仅已核准状态可完成"));
        }
        self.state = ApplicationState::Completed;
        Ok(())
    }

    /// 取消：仅草稿状态可取消
    pub fn cancel(&mut self) -> AppResult<()> {
        if self.state != ApplicationState::Draft {
            return Err(AppError::precondition("仅草稿状态可取消"));
        }
        self.state = ApplicationState::Cancelled;
        Ok(())
    }

    /// 撤销签核：仅已核准或已完成状态，回到草稿并清空序号与历程
    pub fn cancel_sign(&mut self) -> AppResult<()> {
        if !matches!(
            self.state,
            ApplicationState::Approved | ApplicationState::Completed
        ) {
            return Err(AppError::precondition("仅已核准或已完成状态可撤销签核"));
        }
        self.reset_to_draft();
        Ok(())
    }

    /// 撤回签核：草稿和取消状态不允许，其余回到草稿并清空序号与历程
    pub fn back_to_approved(&mut self) -> AppResult<()> {
        if matches!(
            self.state,
            ApplicationState::Draft | ApplicationState::Cancelled
        ) {
            return Err(AppError::precondition("草稿和取消状态无法撤回签核"));
        }
        self.reset_to_draft();
        Ok(())
    }

    /// 回到草稿：仅送签退回或已取消状态
    pub fn back_to_draft(&mut self) -> AppResult<()> {
        if !matches!(
            self.state,
            ApplicationState::RejectedSubmitted | ApplicationState::Cancelled
        ) {
            return Err(AppError::precondition("仅送签退回或已取消状态可回到草稿"));
        }
        self.reset_to_draft();
        Ok(())
    }

    /// 整批替换签核历程缓存
    pub fn replace_history(&mut self, rows: Vec<HistoryEntry>) {
        self.history = rows;
    }

    /// 套用远端查询得到的状态，返回是否发生变化
    pub fn apply_remote_state(&mut self, new_state: ApplicationState) -> bool {
        if new_state == self.state {
            return false;
        }
        self.state = new_state;
        true
    }

    fn reset_to_draft(&mut self) {
        self.state = ApplicationState::Draft;
        // 序号失效后历程缓存没有意义，一并清空
        self.efgp_serial_no = None;
        self.history.clear();
    }
}
