//! 表单字段填充 - 业务能力层
//!
//! 把申请单字段写进远端表单模板。字段对照采用显式映射表：
//! 模板里的字段 id 对应申请单属性与格式化方式，未知 id 原样透传。

use crate::clients::RemoteError;
use crate::error::{AppError, AppResult};
use crate::models::StampApplication;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// 表单字段映射表
///
/// 一个变体对应模板里的一个字段 id。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// EFGP 序号
    SerialNumber,
    /// 申请单号
    ItemNo,
    /// 申请日期
    Date,
    /// 申请人
    Applicant,
    /// 文件名称
    Subject,
    /// 申请原因
    Note,
}

impl FormField {
    /// 从模板字段 id 解析
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "SerialNumber1" => Some(FormField::SerialNumber),
            "itemno" => Some(FormField::ItemNo),
            "Date4" => Some(FormField::Date),
            "odoouser" => Some(FormField::Applicant),
            "subject" => Some(FormField::Subject),
            "note" => Some(FormField::Note),
            _ => None,
        }
    }

    /// 模板字段 id
    pub fn id(self) -> &'static str {
        match self {
            FormField::SerialNumber => "SerialNumber1",
            FormField::ItemNo => "itemno",
            FormField::Date => "Date4",
            FormField::Applicant => "odoouser",
            FormField::Subject => "subject",
            FormField::Note => "note",
        }
    }

    /// EFGP 端的数据类型
    pub fn data_type(self) -> &'static str {
        match self {
            FormField::Date => "java.util.Date",
            _ => "java.lang.String",
        }
    }

    /// 取出对应的申请单字段值
    pub fn value(self, app: &StampApplication) -> String {
        match self {
            FormField::SerialNumber => app.efgp_serial_no.clone().unwrap_or_default(),
            FormField::ItemNo => app.name.clone(),
            FormField::Date => app.date.format("%Y/%m/%d").to_string(),
            FormField::Applicant => app.applicant.clone(),
            FormField::Subject => app.document_name.clone(),
            FormField::Note => app.description.clone(),
        }
    }

    fn wants_per_data_pro_id(self) -> bool {
        !matches!(self, FormField::SerialNumber | FormField::Date)
    }

    fn wants_list_hidden(self) -> bool {
        matches!(self, FormField::Date)
    }
}

/// 把申请单字段填进表单模板
///
/// 模板解析失败返回"回应无法解析"错误；未知字段原样透传。
pub fn fill_template(template_xml: &str, app: &StampApplication) -> AppResult<String> {
    let mut reader = Reader::from_str(template_xml);
    let mut writer = Writer::new(Vec::new());
    // 命中的字段：已写出开始标签，等匹配的结束标签前写入新值
    let mut pending: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                if let Some(field) = field_of(&e)? {
                    let elem = decorate(&e, field)?;
                    writer
                        .write_event(Event::Start(elem))
                        .map_err(|e| write_failed(e.to_string()))?;
                    pending = Some(field.value(app));
                } else {
                    writer
                        .write_event(Event::Start(e))
                        .map_err(|e| write_failed(e.to_string()))?;
                }
            }
            Event::Empty(e) => {
                if let Some(field) = field_of(&e)? {
                    // 自闭合字段展开成 开始-文本-结束
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let elem = decorate(&e, field)?;
                    writer
                        .write_event(Event::Start(elem))
                        .map_err(|e| write_failed(e.to_string()))?;
                    writer
                        .write_event(Event::Text(BytesText::new(&field.value(app))))
                        .map_err(|e| write_failed(e.to_string()))?;
                    writer
                        .write_event(Event::End(BytesEnd::new(name)))
                        .map_err(|e| write_failed(e.to_string()))?;
                } else {
                    writer
                        .write_event(Event::Empty(e))
                        .map_err(|e| write_failed(e.to_string()))?;
                }
            }
            Event::Text(t) => {
                if pending.is_none() {
                    writer
                        .write_event(Event::Text(t))
                        .map_err(|e| write_failed(e.to_string()))?;
                }
                // 命中字段的原值丢弃，由新值取代
            }
            Event::CData(t) => {
                if pending.is_none() {
                    writer
                        .write_event(Event::CData(t))
                        .map_err(|e| write_failed(e.to_string()))?;
                }
            }
            Event::End(e) => {
                if let Some(value) = pending.take() {
                    writer
                        .write_event(Event::Text(BytesText::new(&value)))
                        .map_err(|e| write_failed(e.to_string()))?;
                }
                writer
                    .write_event(Event::End(e))
                    .map_err(|e| write_failed(e.to_string()))?;
            }
            other => {
                writer
                    .write_event(other)
                    .map_err(|e| write_failed(e.to_string()))?;
            }
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|e| write_failed(e.to_string()))
}

/// 取出元素的字段映射（按 id 属性）
fn field_of(e: &BytesStart<'_>) -> AppResult<Option<FormField>> {
    let attr = e
        .try_get_attribute("id")
        .map_err(|e| malformed(e.to_string()))?;
    match attr {
        Some(attr) => {
            let id = attr
                .unescape_value()
                .map_err(|e| malformed(e.to_string()))?;
            Ok(FormField::from_id(&id))
        }
        None => Ok(None),
    }
}

/// 补齐命中字段缺失的属性
fn decorate(e: &BytesStart<'_>, field: FormField) -> AppResult<BytesStart<'static>> {
    let mut elem = e.clone().into_owned();
    let has = |name: &str| -> AppResult<bool> {
        Ok(e.try_get_attribute(name)
            .map_err(|e| malformed(e.to_string()))?
            .is_some())
    };
    if !has("dataType")? {
        elem.push_attribute(("dataType", field.data_type()));
    }
    if field.wants_per_data_pro_id() && !has("perDataProId")? {
        elem.push_attribute(("perDataProId", ""));
    }
    if field.wants_list_hidden() && !has("list_hidden")? {
        elem.push_attribute(("list_hidden", ""));
    }
    Ok(elem)
}

fn malformed(detail: String) -> AppError {
    AppError::Remote(RemoteError::Malformed {
        what: "表单字段模板",
        detail,
    })
}

fn write_failed(detail: String) -> AppError {
    AppError::Other(format!("表单内容生成失败: {}", detail))
}
