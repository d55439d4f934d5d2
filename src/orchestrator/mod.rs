//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责动作调度与记录存取，是整个系统的"指挥中心"。
//!
//! ### `action` - 动作定义
//! - 命令行动作枚举与解析
//! - 面向用户的通知类型（标题 + 信息，从不外露原始错误）
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、执行、落盘）
//! - 读入申请单 → 调度流程 → 写回申请单 → 组装通知
//!
//! ## 层次关系
//!
//! ```text
//! app (调度一次动作)
//!     ↓
//! workflow::SubmitFlow / SyncFlow (编排一次送签/同步)
//!     ↓
//! services (能力层：模板填充 / 附件转存 / 解析 / 轨迹)
//!     ↓
//! clients (远端能力：SOAP / HTTP 上传)
//! ```

pub mod action;
pub mod app;

pub use action::{Action, Notification};
pub use app::App;
