//! 流程实例查询解析 - 业务能力层
//!
//! 解析 `fetchFullProcInstanceWithSerialNo` 的签核历程与
//! `fetchProcInstanceWithSerialNo` 的粗粒度状态，并负责
//! 远端状态代码到本地状态的对照。

use crate::clients::RemoteError;
use crate::models::{ApplicationState, HistoryEntry};
use regex::Regex;
use std::sync::OnceLock;

const ACT_INSTANCE_TAG: &str = "com.dsc.nana.services.webservice.ActInstanceInfo";
const PERFORM_DETAIL_TAG: &str = "com.dsc.nana.services.webservice.PerformDetail";

/// 远端状态代码 → 本地状态对照表
///
/// 只收录与远端状态词汇核对过的代码，未收录的代码不改变本地状态。
static STATE_MAPPING: phf::Map<&'static str, ApplicationState> = phf::phf_map! {
    "open.running.not_performed" => ApplicationState::Submitted,
    "open.running.performed" => ApplicationState::Submitted,
    "closed.completed" => ApplicationState::Approved,
    "closed.terminated" => ApplicationState::Cancelled,
};

/// 远端状态代码 → 历程显示名
static STATE_DISPLAY: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "closed.completed" => "已签核",
    "open.running.not_performed" => "审核中",
    "closed.terminated" => "已终止",
};

/// 把远端状态代码映射为本地状态，未收录的代码返回 `None`
pub fn map_remote_state(code: &str) -> Option<ApplicationState> {
    STATE_MAPPING.get(code).copied()
}

/// 历程里状态代码的显示名，未收录的代码原样显示
pub fn state_display(code: &str) -> &str {
    STATE_DISPLAY.get(code).copied().unwrap_or(code)
}

/// 压缩空白：连续空白（含全角空格）折叠成一个空格并去首尾
pub fn clean_text(value: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[\s\u{3000}]+").expect("空白正则"));
    re.replace_all(value, " ").trim().to_string()
}

/// 流程实例的基本状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStatus {
    /// 状态代码，如 `open.running.not_performed`
    pub state: String,
    /// 流程名称
    pub process_name: String,
    /// 开始时间
    pub start_time: String,
    /// 结束时间
    pub end_time: String,
}

/// 解析完整流程实例 XML 为扁平的（关卡 × 签核人）历程行
///
/// 保持文档顺序：关卡按出现顺序，关卡内签核人按出现顺序。
pub fn parse_history(xml: &str) -> Result<Vec<HistoryEntry>, RemoteError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| RemoteError::Malformed {
        what: "流程历程回应",
        detail: e.to_string(),
    })?;

    let mut rows = Vec::new();
    for act in doc
        .descendants()
        .filter(|n| n.tag_name().name() == ACT_INSTANCE_TAG)
    {
        let activity = clean_text(&direct_child_text(act, "activityName"));
        let state_code = clean_text(&direct_child_text(act, "state"));
        let state = state_display(&state_code).to_string();

        for perf in act
            .descendants()
            .filter(|n| n.tag_name().name() == PERFORM_DETAIL_TAG)
        {
            rows.push(HistoryEntry {
                activity: activity.clone(),
                state: state.clone(),
                signer: clean_text(&direct_child_text(perf, "performerName")),
                time: clean_text(&direct_child_text(perf, "performedTime")),
                comment: clean_text(&direct_child_text(perf, "comment")),
            });
        }
    }
    Ok(rows)
}

/// 解析流程实例基本状态 XML
pub fn parse_status(xml: &str) -> Result<ProcessStatus, RemoteError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| RemoteError::Malformed {
        what: "流程状态回应",
        detail: e.to_string(),
    })?;
    let root = doc.root();
    Ok(ProcessStatus {
        state: child_text(root, "state").trim().to_string(),
        process_name: child_text(root, "processName").trim().to_string(),
        start_time: child_text(root, "startTime").trim().to_string(),
        end_time: child_text(root, "endTime").trim().to_string(),
    })
}

/// 取任意深度后代元素文本，缺失时为空字符串
fn child_text(node: roxmltree::Node<'_, '_>, name: &str) -> String {
    node.descendants()
        .find(|n| n.tag_name().name() == name)
        .and_then(|n| n.text())
        .unwrap_or_default()
        .to_string()
}

/// 取直接子元素文本，缺失时为空字符串
///
/// 关卡与签核人字段只认直接子元素，避免误取嵌套记录里的同名字段。
fn direct_child_text(node: roxmltree::Node<'_, '_>, name: &str) -> String {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .unwrap_or_default()
        .to_string()
}
