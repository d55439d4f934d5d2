//! 送签内容合并 - 业务能力层
//!
//! 把附件区块并进已填充的表单内容：表单以根结束标签收尾时，
//! 区块插在结束标签之前；否则直接追加。合并结果送出前先验证
//! 格式，验证失败时退回只送表单内容的降级方案，不视为硬错误。

use quick_xml::events::Event;
use quick_xml::Reader;

/// 合并后的送签内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// 最终送出的 XML
    pub xml: String,
    /// 是否因验证失败退回了表单内容
    pub degraded: bool,
}

/// 验证字符串是否为格式正确的 XML
pub fn is_well_formed(xml: &str) -> bool {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => return true,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

/// 取出文档根元素的结束标签，如 `</stamp>`
pub fn root_closing_tag(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return Some(format!("</{}>", name));
            }
            // 自闭合根元素没有结束标签可插
            Ok(Event::Empty(_)) | Ok(Event::Eof) => return None,
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

/// 把附件区块并进表单内容
pub fn merge_attachment_block(form_xml: &str, attachment_block: &str) -> String {
    let trimmed = form_xml.trim_end();
    if let Some(closing) = root_closing_tag(form_xml) {
        if let Some(head) = trimmed.strip_suffix(closing.as_str()) {
            return format!("{}\n{}\n{}", head, attachment_block, closing);
        }
    }
    format!("{}\n{}", form_xml, attachment_block)
}

/// 组装最终送签内容
///
/// 没有附件描述时直接用表单内容；有附件时先合并再验证，
/// 验证不过就降级回表单内容。
pub fn build_payload(form_xml: &str, attachment_block: &str, has_descriptors: bool) -> Payload {
    if !has_descriptors {
        return Payload {
            xml: form_xml.to_string(),
            degraded: false,
        };
    }

    let merged = merge_attachment_block(form_xml, attachment_block);
    if is_well_formed(&merged) {
        Payload {
            xml: merged,
            degraded: false,
        }
    } else {
        Payload {
            xml: form_xml.to_string(),
            degraded: true,
        }
    }
}
