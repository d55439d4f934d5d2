//! 应用入口
//!
//! 读入申请单 → 调度流程 → 写回申请单 → 组装通知。
//! 所有错误在这里收口成纯文本通知，不向调用方外露原始异常。

use crate::clients::EfgpSoapClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{RecordStore, StampApplication};
use crate::orchestrator::action::{Action, Notification};
use crate::utils::logging;
use crate::workflow::{SubmitFlow, SyncFlow};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<EfgpSoapClient>,
    store: RecordStore,
    submit_flow: SubmitFlow,
    sync_flow: SyncFlow,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;

        let client = Arc::new(EfgpSoapClient::new(&config));
        let submit_flow = SubmitFlow::new(&config, client.clone());
        let sync_flow = SyncFlow::new(&config, client.clone());
        let store = RecordStore::new(&config.record_folder);

        Ok(Self {
            config,
            client,
            store,
            submit_flow,
            sync_flow,
        })
    }

    /// 执行一次动作，返回面向用户的通知
    pub async fn run(&self, action: Action, record_arg: Option<&str>) -> Notification {
        info!("▶ 执行动作: {}", action);

        if action.needs_remote() && !self.config.efgp_enabled {
            return Notification::new("EFGP 整合未启用", "EFGP 整合未启用，请先在设定中启用");
        }

        if !action.needs_record() {
            return self.test_connection().await;
        }

        let Some(arg) = record_arg else {
            return Notification::new("参数错误", "请指定申请单记录文件");
        };
        let path = self.store.resolve(arg);
        let mut app = match self.store.load(&path) {
            Ok(app) => app,
            Err(e) => return Notification::new("读取申请单失败", e.to_string()),
        };

        self.dispatch(action, &mut app, &path).await
    }

    async fn dispatch(
        &self,
        action: Action,
        app: &mut StampApplication,
        path: &Path,
    ) -> Notification {
        match action {
            Action::Submit => match self.submit_flow.run(app).await {
                Ok(message) => self.persist_then(path, app, "送签成功", message),
                Err(e) => Notification::new("送签失败", e.to_string()),
            },
            Action::Complete => {
                let result = app.complete();
                self.local_transition(path, app, result, "完成", "申请单已完成", "完成失败")
            }
            Action::Cancel => {
                let result = app.cancel();
                self.local_transition(path, app, result, "取消", "申请单已取消", "取消失败")
            }
            Action::CancelSign => {
                let result = app.cancel_sign();
                self.local_transition(
                    path,
                    app,
                    result,
                    "撤销签核成功",
                    "已撤销签核，状态回到草稿，EFGP 序号已清空",
                    "撤销签核失败",
                )
            }
            Action::BackToDraft => {
                let result = app.back_to_draft();
                self.local_transition(
                    path,
                    app,
                    result,
                    "回到草稿成功",
                    "已回到草稿，EFGP 序号已清空",
                    "回到草稿失败",
                )
            }
            Action::BackToApproved => {
                let result = app.back_to_approved();
                self.local_transition(
                    path,
                    app,
                    result,
                    "撤回签核成功",
                    "已撤回签核，状态回到草稿，EFGP 序号与历程已清空",
                    "撤回签核失败",
                )
            }
            Action::RefreshHistory => match self.sync_flow.refresh_history(app).await {
                // 成功与失败都会改写历程缓存，一律写回
                Ok(message) => self.persist_then(path, app, "更新历程", message),
                Err(e) => {
                    self.persist_then(path, app, "更新历程", format!("❌ 更新历程失败: {}", e))
                }
            },
            Action::RefreshStatus => match self.sync_flow.refresh_status(app).await {
                Ok(message) => self.persist_then(path, app, "EFGP 状态更新成功", message),
                Err(e) if e.is_precondition() => {
                    Notification::new("更新 EFGP 状态失败", e.to_string())
                }
                Err(e) => Notification::new("EFGP 状态更新失败", format!("查询失败: {}", e)),
            },
            Action::TestConnection => self.test_connection().await,
        }
    }

    /// 本地状态转移的统一收口：成功则写回并通知，守卫违反则原样显示
    fn local_transition(
        &self,
        path: &Path,
        app: &StampApplication,
        result: AppResult<()>,
        ok_title: &str,
        ok_message: &str,
        fail_title: &str,
    ) -> Notification {
        match result {
            Ok(()) => self.persist_then(path, app, ok_title, ok_message.to_string()),
            Err(e) => Notification::new(fail_title, e.to_string()),
        }
    }

    /// 写回申请单后返回通知；写回失败时以失败通知取代
    fn persist_then(
        &self,
        path: &Path,
        app: &StampApplication,
        title: &str,
        message: impl Into<String>,
    ) -> Notification {
        match self.store.save(path, app) {
            Ok(()) => Notification::new(title, message),
            Err(e) => Notification::new("写回申请单失败", e.to_string()),
        }
    }

    /// 测试 EFGP 连线
    async fn test_connection(&self) -> Notification {
        let message = match self.client.test_connection().await {
            Ok(200) => "连线成功！".to_string(),
            Ok(code) => format!("连线失败，状态码：{}", code),
            Err(e) => format!("连线失败：{}", e),
        };
        Notification::new("测试 EFGP 连线", message)
    }
}
