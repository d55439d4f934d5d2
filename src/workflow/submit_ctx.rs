//! 送签上下文
//!
//! 封装"我正在把哪张申请单送进哪个流程"这一信息

use crate::config::Config;
use crate::models::StampApplication;
use std::fmt::Display;

/// 送签上下文
///
/// 包含一次送签所需的所有标识信息
#[derive(Debug, Clone)]
pub struct SubmitCtx {
    /// 申请单号
    pub record_name: String,

    /// EFGP 流程包 ID
    pub process_id: String,

    /// 送签人工号
    pub requester_id: String,

    /// 送签部门代码
    pub org_unit_id: String,

    /// 送签主题
    pub subject: String,
}

impl SubmitCtx {
    /// 从配置与申请单创建送签上下文
    pub fn new(config: &Config, app: &StampApplication) -> Self {
        Self {
            record_name: app.name.clone(),
            process_id: config.process_id.clone(),
            requester_id: config.requester_id.clone(),
            org_unit_id: config.org_unit_id.clone(),
            subject: app.subject(),
        }
    }
}

impl Display for SubmitCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[申请单#{} 流程#{} 送签人#{}]",
            self.record_name, self.process_id, self.requester_id
        )
    }
}
