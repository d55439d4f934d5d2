//! 签核轨迹写入 - 业务能力层
//!
//! 只负责"给某张申请单追加一行轨迹"能力，不关心流程。

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 签核轨迹写入服务
///
/// 职责：
/// - 把送签过程与状态查询的结果追加到 `<目录>/<申请单号>.log`
/// - 只处理单条轨迹
/// - 轨迹写入失败不能中断业务流程，只记录日志
pub struct AuditWriter {
    folder: PathBuf,
}

impl AuditWriter {
    /// 创建指向默认目录的轨迹写入服务
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// 追加一行轨迹
    pub fn note(&self, record_name: &str, message: &str) {
        if let Err(e) = self.try_note(record_name, message) {
            warn!("轨迹写入失败 ({}): {}", record_name, e);
        }
    }

    fn try_note(&self, record_name: &str, message: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.folder)?;
        let path = self.folder.join(format!("{}.log", record_name));

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let line = format!(
            "[{}] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        );
        file.write_all(line.as_bytes())?;

        debug!("轨迹: {} | {}", record_name, message);
        Ok(())
    }
}
