//! 附件引用
//!
//! 附件的二进制内容由外部持有，本系统只读取、从不创建。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 附件引用：原始文件名 + 媒体类型 + 内容所在路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// 原始文件名（含扩展名）
    pub name: String,
    /// 媒体类型
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    /// 二进制内容所在路径
    pub path: PathBuf,
}

impl Attachment {
    /// 扩展名（含点），无扩展名时为空字符串
    pub fn extension(&self) -> String {
        match self.name.rfind('.') {
            Some(idx) if idx > 0 => self.name[idx..].to_string(),
            _ => String::new(),
        }
    }

    /// 媒体类型，未指定时退回 application/octet-stream
    pub fn mime(&self) -> &str {
        self.mimetype.as_deref().unwrap_or("application/octet-stream")
    }

    /// 读取附件内容
    ///
    /// 文件不存在、不可读或内容为空都返回 `None`，
    /// 由调用方按"略过并记录警告"处理。
    pub fn content(&self) -> Option<Vec<u8>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            _ => None,
        }
    }
}
