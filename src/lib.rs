//! # Stamp Submit
//!
//! 用印申请单管理与 EFGP 签核整合的 Rust 实现
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 远端能力层（Clients）
//! - `clients/` - 持有远端连接，只暴露能力
//! - `EfgpSoapClient` - WorkflowService 六个 SOAP 操作
//! - `DocUploadClient` - 附件二次上传候选端点
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单一职责
//! - `form_template` - 表单字段填充能力
//! - `attachment_transfer` - 附件预留与转存能力
//! - `payload` - 送签内容合并与验证能力
//! - `process_query` - 流程实例解析与状态对照能力
//! - `AuditWriter` - 写签核轨迹能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张申请单"的完整处理流程
//! - `SubmitCtx` - 送签上下文封装
//! - `SubmitFlow` - 送签编排（模板 → 附件 → 合并 → 启动 → 序号）
//! - `SyncFlow` - 历程与状态同步编排
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 动作调度，读入记录、调流程、写回、出通知
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{EfgpSoapClient, RemoteError, ReservedSlot, WorkflowService};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ApplicationState, Attachment, HistoryEntry, StampApplication};
pub use orchestrator::{Action, App, Notification};
pub use workflow::{SubmitCtx, SubmitFlow, SyncFlow};
