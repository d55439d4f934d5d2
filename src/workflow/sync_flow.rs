//! 状态与历程同步流程 - 流程层
//!
//! 按序号向远端查询流程实例，重建本地历程缓存或套用粗粒度状态。
//! 历程永远整批替换：远端记录缩水时本地不能留下陈旧行。

use crate::clients::WorkflowService;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::StampApplication;
use crate::services::{process_query, AuditWriter};
use std::sync::Arc;
use tracing::{info, warn};

/// 同步流程
pub struct SyncFlow {
    client: Arc<dyn WorkflowService>,
    audit: AuditWriter,
}

impl SyncFlow {
    /// 创建新的同步流程
    pub fn new(config: &Config, client: Arc<dyn WorkflowService>) -> Self {
        Self {
            client,
            audit: AuditWriter::new(&config.audit_folder),
        }
    }

    /// 只更新签核历程，不改变状态
    ///
    /// 没有序号不是错误：历程清空后直接返回。
    /// 远端调用失败时同样清空历程，错误向上抛出。
    pub async fn refresh_history(&self, app: &mut StampApplication) -> AppResult<String> {
        let Some(serial_no) = app.efgp_serial_no.clone() else {
            app.replace_history(Vec::new());
            return Ok("没有 EFGP 序号，历程已清空".to_string());
        };

        let rows = match self
            .client
            .fetch_full_proc_instance_with_serial_no(&serial_no)
            .await
            .and_then(|xml| process_query::parse_history(&xml))
        {
            Ok(rows) => rows,
            Err(e) => {
                app.replace_history(Vec::new());
                warn!("[申请单#{}] ❌ 更新历程失败: {}", app.name, e);
                self.audit
                    .note(&app.name, &format!("❌ 更新历程失败: {}", e));
                return Err(e.into());
            }
        };

        let count = rows.len();
        app.replace_history(rows);
        info!("[申请单#{}] ✅ 已更新签核历程 ({} 笔记录)", app.name, count);
        self.audit
            .note(&app.name, &format!("✅ 已更新签核历程 ({} 笔记录)", count));
        Ok(format!("✅ 已更新签核历程 ({} 笔记录)", count))
    }

    /// 只更新 EFGP 状态
    ///
    /// 远端状态代码经对照表映射；未收录的代码保持状态不变。
    /// 无论状态是否变化都记录一笔查询轨迹。
    pub async fn refresh_status(&self, app: &mut StampApplication) -> AppResult<String> {
        let Some(serial_no) = app.efgp_serial_no.clone() else {
            return Err(AppError::precondition("没有 EFGP 序号，无法查询状态"));
        };

        let xml = self
            .client
            .fetch_proc_instance_with_serial_no(&serial_no)
            .await?;
        let status = process_query::parse_status(&xml)?;

        let detail = format!(
            "流程状态: {}\n流程名称: {}\n开始时间: {}\n结束时间: {}",
            status.state, status.process_name, status.start_time, status.end_time
        );

        match process_query::map_remote_state(&status.state) {
            Some(new_state) if new_state != app.state => {
                let old_state = app.state;
                app.apply_remote_state(new_state);
                info!(
                    "[申请单#{}] 🔄 EFGP 状态已更新: {} -> {}",
                    app.name, old_state, new_state
                );
                self.audit.note(
                    &app.name,
                    &format!(
                        "🔄 EFGP 状态已更新: {} -> {}\n{}",
                        old_state, new_state, detail
                    ),
                );
                Ok(format!("✅ 状态已更新: {} → {}", old_state, new_state))
            }
            _ => {
                info!("[申请单#{}] ℹ️ EFGP 状态查询完成，状态保持不变", app.name);
                self.audit
                    .note(&app.name, &format!("ℹ️ EFGP 状态查询完成\n{}", detail));
                Ok(format!("ℹ️ 状态保持不变: {}", app.state))
            }
        }
    }
}
