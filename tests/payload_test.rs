//! 表单填充与送签内容合并

mod common;

use common::{draft_app, TEMPLATE_XML};
use stamp_submit::services::{fill_template, payload};

#[test]
fn test_fill_template_maps_known_fields() {
    let mut app = draft_app("SA2024001");
    app.efgp_serial_no = None;

    let filled = fill_template(TEMPLATE_XML, &app).expect("填充失败");

    assert!(filled.contains("SA2024001"), "申请单号应写入 itemno");
    assert!(filled.contains("2024/07/15"), "日期应为 YYYY/MM/DD 格式");
    assert!(filled.contains("王小明"), "申请人应写入 odoouser");
    assert!(filled.contains("合约A"), "文件名称应写入 subject");
    assert!(filled.contains("合约用印"), "申请原因应写入 note");
}

#[test]
fn test_fill_template_decorates_missing_attributes() {
    let app = draft_app("SA2024002");
    let filled = fill_template(TEMPLATE_XML, &app).expect("填充失败");

    assert!(filled.contains(r#"dataType="java.util.Date""#));
    assert!(filled.contains(r#"dataType="java.lang.String""#));
    assert!(filled.contains(r#"perDataProId="""#));
    assert!(filled.contains(r#"list_hidden="""#));
}

#[test]
fn test_fill_template_passes_unknown_fields_through() {
    let app = draft_app("SA2024003");
    let filled = fill_template(TEMPLATE_XML, &app).expect("填充失败");

    // 未知字段 id 原样透传，原值不动、属性不加
    assert!(filled.contains("保持原值"));
    assert!(!filled.contains(r#"id="other" dataType"#));
}

#[test]
fn test_fill_template_keeps_existing_attributes() {
    let template = r#"<stamp><field id="subject" dataType="custom">旧值</field></stamp>"#;
    let app = draft_app("SA2024004");
    let filled = fill_template(template, &app).expect("填充失败");

    assert!(filled.contains(r#"dataType="custom""#), "已有属性不覆盖");
    assert!(filled.contains("合约A"));
    assert!(!filled.contains("旧值"));
}

#[test]
fn test_fill_template_rejects_broken_template() {
    let app = draft_app("SA2024005");
    assert!(fill_template("<stamp><field id=", &app).is_err());
}

#[test]
fn test_merge_places_block_before_root_closing_tag_once() {
    let form = r#"<stamp><field id="subject">合约A</field></stamp>"#;
    let block = "<Attachment id=\"Attachment\"><attachments><attachment OID=\"oid1\"/></attachments></Attachment>";

    let merged = payload::merge_attachment_block(form, block);

    let closing_count = merged.matches("</stamp>").count();
    assert_eq!(closing_count, 1, "根结束标签应只出现一次");
    let block_pos = merged.find("<Attachment").expect("应包含附件区块");
    let closing_pos = merged.rfind("</stamp>").expect("应有根结束标签");
    assert!(block_pos < closing_pos, "附件区块应在根结束标签之前");
    assert!(payload::is_well_formed(&merged));
}

#[test]
fn test_merge_appends_when_no_closing_tag_suffix() {
    let form = "<stamp/>";
    let block = "<Attachment id=\"Attachment\"><attachments/></Attachment>";
    let merged = payload::merge_attachment_block(form, block);
    assert!(merged.ends_with(block));
}

#[test]
fn test_build_payload_without_descriptors_uses_form_only() {
    let form = r#"<stamp><field id="subject">合约A</field></stamp>"#;
    let result = payload::build_payload(form, "<Attachment/>", false);
    assert_eq!(result.xml, form);
    assert!(!result.degraded);
}

#[test]
fn test_build_payload_degrades_on_invalid_merge() {
    let form = r#"<stamp><field id="subject">合约A</field></stamp>"#;
    // 区块本身残缺，合并结果无法通过验证
    let block = "<Attachment id=\"Attachment\"><attachments><attachment OID=\"x\">";
    let result = payload::build_payload(form, block, true);

    assert!(result.degraded, "验证失败应降级");
    assert_eq!(result.xml, form, "降级后只送表单内容");
}

#[test]
fn test_is_well_formed() {
    assert!(payload::is_well_formed("<a><b>文</b></a>"));
    assert!(!payload::is_well_formed("<a><b></a>"));
    assert!(!payload::is_well_formed("not xml <"));
}
