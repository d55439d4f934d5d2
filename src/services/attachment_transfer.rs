//! 附件转存 - 业务能力层
//!
//! 逐个附件：预留远端文件空间、把内容复制到文件服务器共享目录、
//! 生成附件描述元素。单个附件的失败只记录为警告，不中断整体送签。

use crate::clients::{ReservedSlot, WorkflowService};
use crate::models::Attachment;
use quick_xml::escape::escape;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 附件描述里 permission/user 的 OID
const PERMISSION_USER_OID: &str = "1510da25f51510048c78e2dd31f1da3d";

const BLOCK_HEADER: &str = "    <Attachment id=\"Attachment\">\n        <attachments>\n";
const BLOCK_FOOTER: &str = "        </attachments>\n    </Attachment>\n";

/// 单个附件的转存状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    /// 已复制到共享目录并生成描述
    Copied { target: PathBuf },
    /// 无内容，已略过
    SkippedEmpty,
    /// 预留或复制失败，已略过
    Failed { reason: String },
}

/// 单个附件的转存结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// 原始文件名
    pub file_name: String,
    pub status: TransferStatus,
}

/// 整批附件的转存结果
#[derive(Debug, Clone)]
pub struct TransferResult {
    /// 附件描述区块 XML
    pub block: String,
    /// 逐附件结果，保持申请单内的顺序
    pub outcomes: Vec<TransferOutcome>,
    /// 附件总数
    pub total: usize,
    /// 略过数
    pub skipped: usize,
    /// 区块里是否有附件描述
    pub has_descriptors: bool,
}

/// 附件转存服务
pub struct AttachmentTransfer {
    share_root: PathBuf,
}

impl AttachmentTransfer {
    /// 创建指向共享目录根路径的转存服务
    pub fn new(share_root: impl Into<PathBuf>) -> Self {
        Self {
            share_root: share_root.into(),
        }
    }

    /// 依序转存所有附件并组装描述区块
    pub async fn run(
        &self,
        client: &dyn WorkflowService,
        attachments: &[Attachment],
    ) -> TransferResult {
        let mut block = String::from(BLOCK_HEADER);
        let mut outcomes = Vec::with_capacity(attachments.len());
        let mut skipped = 0usize;
        let mut descriptors = 0usize;

        for attachment in attachments {
            let (status, descriptor) = self.transfer_one(client, attachment).await;
            match &status {
                TransferStatus::Copied { target } => {
                    descriptors += 1;
                    debug!("已复制附件 {} 到 {}", attachment.name, target.display());
                }
                TransferStatus::SkippedEmpty | TransferStatus::Failed { .. } => {
                    skipped += 1;
                }
            }
            if let Some(descriptor) = descriptor {
                block.push_str(&descriptor);
            }
            outcomes.push(TransferOutcome {
                file_name: attachment.name.clone(),
                status,
            });
        }

        block.push_str(BLOCK_FOOTER);

        TransferResult {
            block,
            outcomes,
            total: attachments.len(),
            skipped,
            has_descriptors: descriptors > 0,
        }
    }

    /// 转存单个附件，成功时一并返回描述元素
    async fn transfer_one(
        &self,
        client: &dyn WorkflowService,
        attachment: &Attachment,
    ) -> (TransferStatus, Option<String>) {
        let slot = match client.reserve_no_cm_document(&attachment.name).await {
            Ok(slot) => slot,
            Err(e) => {
                warn!("附件 {} 预留失败: {}", attachment.name, e);
                let status = TransferStatus::Failed {
                    reason: format!("预留文件空间失败: {}", e),
                };
                return (status, None);
            }
        };

        let Some(content) = attachment.content() else {
            return (TransferStatus::SkippedEmpty, None);
        };

        let target_dir = self.target_dir(&slot);
        let target_filename = format!("{}{}", slot.physical_name, attachment.extension());
        let target = target_dir.join(&target_filename);

        if let Err(e) = std::fs::create_dir_all(&target_dir) {
            warn!("附件 {} 目录创建失败: {}", attachment.name, e);
            let status = TransferStatus::Failed {
                reason: format!("目录创建失败 ({}): {}", target_dir.display(), e),
            };
            return (status, None);
        }
        if let Err(e) = std::fs::write(&target, &content) {
            warn!("附件 {} 复制失败: {}", attachment.name, e);
            let status = TransferStatus::Failed {
                reason: format!("复制失败 ({}): {}", target.display(), e),
            };
            return (status, None);
        }

        let descriptor = descriptor(attachment, &slot, &target_filename, content.len());
        (TransferStatus::Copied { target }, Some(descriptor))
    }

    fn target_dir(&self, slot: &ReservedSlot) -> PathBuf {
        let mut dir = self.share_root.clone();
        for part in slot
            .file_path
            .split(|c| c == '/' || c == '\\')
            .filter(|p: &&str| !p.is_empty())
        {
            dir.push(part);
        }
        dir
    }
}

/// 生成单个附件的描述元素
fn descriptor(
    attachment: &Attachment,
    slot: &ReservedSlot,
    target_filename: &str,
    file_size: usize,
) -> String {
    let file_type = attachment.extension().trim_start_matches('.').to_string();
    let upload_time = chrono::Utc::now().timestamp_millis();
    format!(
        "            <attachment OID=\"{}\" fileSize=\"{}\" fileType=\"{}\" name=\"{}\" originalFileName=\"{}\" uploadTime=\"{}\">\n                <description/>\n                <permission>\n                    <user OID=\"{}\" restriction=\"1\"/>\n                </permission>\n            </attachment>\n",
        escape(&slot.oid),
        file_size,
        escape(&file_type),
        escape(target_filename),
        escape(&attachment.name),
        upload_time,
        PERMISSION_USER_OID
    )
}
