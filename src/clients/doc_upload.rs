//! 附件二次上传客户端
//!
//! 依序尝试候选 HTTP 端点，取第一个 2xx 为成功；
//! 全部失败时降级为"只预留空间"的部分结果，不再重试、不致命。

use crate::clients::workflow_service::ReservedSlot;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{info, warn};

const USER_AGENT: &str = "stamp-submit/1.0";

/// 单个附件的上传结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// 某个候选端点返回 2xx
    Uploaded { url: String },
    /// 所有候选端点都失败，仅保留预留空间
    ReservedOnly { last_error: String },
}

/// 文件上传客户端
pub struct DocUploadClient {
    endpoints: Vec<String>,
    http: reqwest::Client,
    timeout: Duration,
}

impl DocUploadClient {
    /// 创建新的上传客户端
    pub fn new(endpoints: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            endpoints,
            http: reqwest::Client::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 依序尝试所有候选端点上传一个附件
    pub async fn upload(
        &self,
        file_name: &str,
        mimetype: &str,
        content: &[u8],
        slot: &ReservedSlot,
        serial_no: &str,
    ) -> UploadOutcome {
        let mut last_error = String::from("无候选上传端点");

        for template in &self.endpoints {
            let url = template
                .replace("{filePath}", &slot.file_path)
                .replace("{physicalName}", &slot.physical_name);

            info!("尝试 HTTP 上传到: {}", url);

            let part = Part::bytes(content.to_vec()).file_name(slot.physical_name.clone());
            let part = part.mime_str(mimetype).unwrap_or_else(|_| {
                Part::bytes(content.to_vec()).file_name(slot.physical_name.clone())
            });

            let form = Form::new()
                .part("file", part)
                .text("filePath", slot.file_path.clone())
                .text("physicalName", slot.physical_name.clone())
                .text("oid", slot.oid.clone())
                .text("docServerId", slot.doc_server_id.clone())
                .text("fileName", file_name.to_string())
                .text("serialNo", serial_no.to_string());

            let sent = self
                .http
                .post(&url)
                .timeout(self.timeout)
                .header("User-Agent", USER_AGENT)
                .multipart(form)
                .send()
                .await;

            match sent {
                Ok(resp) if resp.status().is_success() => {
                    info!("✅ HTTP 上传成功: {}", url);
                    return UploadOutcome::Uploaded { url };
                }
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let text = resp.text().await.unwrap_or_default();
                    last_error = format!("HTTP {}: {}", status, text);
                    warn!("❌ HTTP 上传失败: {} - {}", url, last_error);
                }
                Err(e) => {
                    last_error = format!("HTTP 连接失败: {}", e);
                    warn!("❌ HTTP 连接失败: {} - {}", url, e);
                }
            }
        }

        info!("HTTP 上传失败，改为只预留文件空间");
        UploadOutcome::ReservedOnly { last_error }
    }
}
