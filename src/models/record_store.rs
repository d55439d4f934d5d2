//! 申请单 TOML 存取
//!
//! 一张申请单一个 TOML 文件，动作执行前读入、执行后写回。
//! 历程缓存也随文件保存，但远端流程引擎才是事实来源。

use crate::error::{AppError, AppResult, FileError};
use crate::models::application::StampApplication;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 申请单文件存取
pub struct RecordStore {
    folder: PathBuf,
}

impl RecordStore {
    /// 创建指向指定目录的存取器
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// 把命令行参数解析为记录文件路径
    ///
    /// 既接受现成路径，也接受存放目录下的裸记录名。
    pub fn resolve(&self, arg: &str) -> PathBuf {
        let direct = PathBuf::from(arg);
        if direct.exists() {
            return direct;
        }
        if arg.ends_with(".toml") {
            return self.folder.join(arg);
        }
        self.folder.join(format!("{}.toml", arg))
    }

    /// 读入一张申请单
    pub fn load(&self, path: &Path) -> AppResult<StampApplication> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(display.clone(), e))?;
        let app: StampApplication = toml::from_str(&text).map_err(|e| {
            AppError::File(FileError::TomlParseFailed {
                path: display,
                source: Box::new(e),
            })
        })?;
        debug!("已读入申请单 {} (状态: {})", app.name, app.state);
        Ok(app)
    }

    /// 写回一张申请单
    pub fn save(&self, path: &Path, app: &StampApplication) -> AppResult<()> {
        let display = path.display().to_string();
        let text = toml::to_string_pretty(app)
            .map_err(|e| AppError::Other(format!("序列化申请单失败: {}", e)))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::file_write_failed(display.clone(), e))?;
            }
        }
        std::fs::write(path, text).map_err(|e| AppError::file_write_failed(display, e))?;
        debug!("已写回申请单 {} (状态: {})", app.name, app.state);
        Ok(())
    }
}
