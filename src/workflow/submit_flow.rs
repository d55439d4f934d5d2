//! 送签流程 - 流程层
//!
//! 核心职责：定义"一张申请单"的完整送签流程
//!
//! 流程顺序：
//! 1. 前置检查 → 取表单 OID → 填充字段模板
//! 2. 逐附件预留空间、复制到共享目录、生成描述区块
//! 3. 合并验证 → 启动流程 → 解析序号 → 附件二次上传（兜底）
//! 4. 写入状态与序号，记录轨迹
//!
//! 启动流程调用失败是致命错误且不改变本地状态；
//! 单个附件的失败只累积为警告。

use crate::clients::{
    DocUploadClient, InvokeProcessRequest, RemoteError, UploadOutcome, WorkflowService,
};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::StampApplication;
use crate::services::{form_template, payload, AttachmentTransfer, AuditWriter, TransferResult, TransferStatus};
use crate::utils::logging;
use crate::workflow::submit_ctx::SubmitCtx;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{error, info, warn};

/// 送签流程
///
/// - 编排完整的送签步骤
/// - 不直接持有 SOAP 实现，只依赖注入的 WorkflowService 能力
pub struct SubmitFlow {
    client: Arc<dyn WorkflowService>,
    transfer: AttachmentTransfer,
    uploader: DocUploadClient,
    audit: AuditWriter,
    config: Config,
}

impl SubmitFlow {
    /// 创建新的送签流程
    pub fn new(config: &Config, client: Arc<dyn WorkflowService>) -> Self {
        Self {
            client,
            transfer: AttachmentTransfer::new(&config.efgp_share_root),
            uploader: DocUploadClient::new(
                config.upload_endpoints.clone(),
                config.request_timeout_secs,
            ),
            audit: AuditWriter::new(&config.audit_folder),
            config: config.clone(),
        }
    }

    /// 执行送签，成功时返回面向用户的结果信息
    pub async fn run(&self, app: &mut StampApplication) -> AppResult<String> {
        app.ensure_can_submit()?;

        let ctx = SubmitCtx::new(&self.config, app);
        info!("{} 🚀 开始送签: {}", ctx, app.document_name);

        // ========== 步骤 1: 取得表单 OID ==========
        let form_oid = self
            .client
            .find_form_oids_of_process(&ctx.process_id)
            .await?
            .trim()
            .to_string();
        if form_oid.is_empty() {
            return Err(AppError::Remote(RemoteError::Malformed {
                what: "表单 OID",
                detail: "回应为空，请检查流程ID或WebService回应".to_string(),
            }));
        }

        // ========== 步骤 2: 取得并填充表单字段 ==========
        let template = self.client.get_form_field_template(&form_oid).await?;
        let filled = form_template::fill_template(&template, app)?;

        // ========== 步骤 3: 转存附件 ==========
        let transfer = self
            .transfer
            .run(self.client.as_ref(), &app.attachments)
            .await;
        self.audit_transfer(&ctx, &transfer);

        // ========== 步骤 4: 合并与验证 ==========
        let payload = payload::build_payload(&filled, &transfer.block, transfer.has_descriptors);
        if payload.degraded {
            warn!("{} ⚠️ XML 格式验证失败，改用表单内容重新送签", ctx);
            self.audit
                .note(&ctx.record_name, "⚠️ XML 格式验证失败，改用表单内容重新送签");
        }
        if self.config.verbose_logging {
            info!(
                "{} 📋 送签 XML 内容: {}",
                ctx,
                logging::truncate_text(&payload.xml, 1000)
            );
        }

        // ========== 步骤 5: 启动流程 ==========
        let request = InvokeProcessRequest {
            process_package_id: &ctx.process_id,
            requester_id: &ctx.requester_id,
            org_unit_id: &ctx.org_unit_id,
            form_def_oid: &form_oid,
            form_field_value: &payload.xml,
            subject: &ctx.subject,
            post_acts_xml: "",
        };
        let result = match self.client.invoke_process_and_add_cust_act(&request).await {
            Ok(result) => result,
            Err(e) => {
                // 此路径上本地状态不发生任何变化
                error!("{} ❌ EFGP 送签失败: {}", ctx, e);
                self.audit
                    .note(&ctx.record_name, &format!("❌ EFGP 送签失败: {}", e));
                return Err(AppError::submission_failed(e.to_string()));
            }
        };
        info!(
            "{} ✓ EFGP 回传: {}",
            ctx,
            logging::truncate_text(&result, 200)
        );
        self.audit
            .note(&ctx.record_name, &format!("✅ 已送签到 EFGP，回传: {}", result));

        // ========== 步骤 6: 解析序号 ==========
        let serial_no = extract_serial(&result);
        match &serial_no {
            Some(serial) => info!("{} ✓ 取得 EFGP 序号: {}", ctx, serial),
            None => warn!("{} ⚠️ 回传内容中未找到序号", ctx),
        }

        // ========== 步骤 7: 附件二次上传（尽力而为） ==========
        let upload_summary = match &serial_no {
            Some(serial) => self.secondary_upload_pass(&ctx, app, serial).await,
            None => Vec::new(),
        };

        // ========== 步骤 8: 写入状态与序号 ==========
        app.mark_submitted(serial_no.clone())?;

        // ========== 步骤 9: 组装结果信息 ==========
        let mut message = format!(
            "已送签到 EFGP！EFGP序号: {}",
            serial_no.as_deref().unwrap_or("未取得")
        );
        if !upload_summary.is_empty() {
            message.push_str(&format!("\n📎 附件处理 {} 笔:", upload_summary.len()));
            for line in &upload_summary {
                message.push('\n');
                message.push_str(line);
            }
        }
        self.audit.note(&ctx.record_name, &message);

        info!("{} ✅ 送签完成", ctx);
        Ok(message)
    }

    // ========== 轨迹辅助方法 ==========

    /// 把逐附件转存结果写进日志与轨迹
    fn audit_transfer(&self, ctx: &SubmitCtx, result: &TransferResult) {
        for (idx, outcome) in result.outcomes.iter().enumerate() {
            match &outcome.status {
                TransferStatus::Copied { target } => {
                    info!(
                        "{} ✅ [{}/{}] 已复制附件 {} 到 EFGP 目录 {}",
                        ctx,
                        idx + 1,
                        result.total,
                        outcome.file_name,
                        target.display()
                    );
                    self.audit.note(
                        &ctx.record_name,
                        &format!(
                            "✅ [{}/{}] 已复制附件 {} 到 EFGP 目录 {}",
                            idx + 1,
                            result.total,
                            outcome.file_name,
                            target.display()
                        ),
                    );
                }
                TransferStatus::SkippedEmpty => {
                    warn!("{} ⚠️ 附件 {} 无内容，已略过", ctx, outcome.file_name);
                    self.audit.note(
                        &ctx.record_name,
                        &format!("⚠️ 附件 {} 无内容，已略过", outcome.file_name),
                    );
                }
                TransferStatus::Failed { reason } => {
                    warn!("{} ⚠️ 附件 {} 处理失败: {}", ctx, outcome.file_name, reason);
                    self.audit.note(
                        &ctx.record_name,
                        &format!("⚠️ 附件 {} 处理失败: {}", outcome.file_name, reason),
                    );
                }
            }
        }
        self.audit.note(
            &ctx.record_name,
            &format!(
                "📎 本次共处理附件 {} 笔，略过 {} 笔",
                result.total, result.skipped
            ),
        );
    }

    /// 附件二次上传：逐个预留空间后尝试候选端点
    ///
    /// 全程尽力而为，任何失败只生成一行总结，不中断送签。
    async fn secondary_upload_pass(
        &self,
        ctx: &SubmitCtx,
        app: &StampApplication,
        serial_no: &str,
    ) -> Vec<String> {
        let total = app.attachments.len();
        let mut lines = Vec::with_capacity(total);

        for (i, attachment) in app.attachments.iter().enumerate() {
            if i > 0 {
                // 间隔一秒，避免 EFGP 系统负载过重
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            info!(
                "{} 开始处理附件 {}/{}: {}",
                ctx,
                i + 1,
                total,
                attachment.name
            );

            let slot = match self.client.reserve_no_cm_document(&attachment.name).await {
                Ok(slot) => slot,
                Err(e) => {
                    warn!("{} ❌ 附件 {} 预留失败: {}", ctx, attachment.name, e);
                    lines.push(format!("  • {} (预留失败: {})", attachment.name, e));
                    continue;
                }
            };

            let Some(content) = attachment.content() else {
                lines.push(format!("  • {} (无法取得文件内容)", attachment.name));
                continue;
            };

            match self
                .uploader
                .upload(&attachment.name, attachment.mime(), &content, &slot, serial_no)
                .await
            {
                UploadOutcome::Uploaded { url } => {
                    lines.push(format!("  • {} (HTTP 上传成功: {})", attachment.name, url));
                }
                UploadOutcome::ReservedOnly { last_error } => {
                    lines.push(format!(
                        "  • {} (只预留文件空间，未上传内容: {})",
                        attachment.name, last_error
                    ));
                }
            }
        }

        lines
    }
}

/// 从回传文本中解析 EFGP 序号（固定前缀 stamp + 数字）
pub fn extract_serial(result: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"stamp\d+").expect("序号正则"));
    re.find(result).map(|m| m.as_str().to_string())
}
