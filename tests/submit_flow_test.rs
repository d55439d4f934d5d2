//! 送签流程端到端（注入内存假 WorkflowService）

mod common;

use common::{attachment_file, draft_app, test_config, FakeWorkflowService};
use stamp_submit::workflow::submit_flow::extract_serial;
use stamp_submit::{AppError, ApplicationState, SubmitFlow};
use std::sync::Arc;

#[tokio::test]
async fn test_submit_success_with_empty_attachment() {
    let tag = "submit_ok";
    let config = test_config(tag);
    let fake = Arc::new(FakeWorkflowService::default());
    let flow = SubmitFlow::new(&config, fake.clone());

    let mut app = draft_app("SA2024101");
    app.attachments = vec![
        attachment_file(tag, "contract.pdf", b"%PDF-1.4 content"),
        attachment_file(tag, "empty.pdf", b""),
    ];

    let message = flow.run(&mut app).await.expect("送签应成功");

    // 状态与序号
    assert_eq!(app.state, ApplicationState::Submitted);
    assert_eq!(app.efgp_serial_no.as_deref(), Some("stamp20240001"));
    // 历程只由更新历程动作填充
    assert!(app.history.is_empty());
    assert!(message.contains("stamp20240001"));

    // 送出的内容：恰好一个附件描述，且在根结束标签之前
    let calls = fake.calls.lock().unwrap();
    assert_eq!(calls.invoked_payloads.len(), 1);
    let payload = &calls.invoked_payloads[0];
    assert_eq!(payload.matches("<attachment OID=").count(), 1);
    let block_pos = payload.find("<Attachment").expect("应有附件区块");
    let closing_pos = payload.rfind("</stamp>").expect("应有根结束标签");
    assert!(block_pos < closing_pos);
    assert!(payload.contains("originalFileName=\"contract.pdf\""));

    // 送签主题
    assert_eq!(calls.invoked_subjects[0], "用印申请 - 合约A");

    // 附件已复制到共享目录（首次预留的路径）
    let copied = std::path::Path::new(&config.efgp_share_root)
        .join("2024")
        .join("07")
        .join("01")
        .join("phys0001.pdf");
    assert!(copied.exists(), "附件内容应复制到共享目录");

    // 空附件的警告写进轨迹
    let audit = std::fs::read_to_string(
        std::path::Path::new(&config.audit_folder).join("SA2024101.log"),
    )
    .expect("应有轨迹文件");
    assert!(audit.contains("无内容，已略过"));
    assert!(audit.contains("已送签到 EFGP"));
}

#[tokio::test]
async fn test_submit_rejects_non_draft_without_side_effects() {
    let config = test_config("submit_guard");
    let fake = Arc::new(FakeWorkflowService::default());
    let flow = SubmitFlow::new(&config, fake.clone());

    let mut app = draft_app("SA2024102");
    app.state = ApplicationState::Approved;
    app.efgp_serial_no = Some("stamp555".to_string());

    let err = flow.run(&mut app).await.unwrap_err();
    assert!(err.is_precondition());

    // 没有任何远端调用，状态原封不动
    assert!(fake.calls.lock().unwrap().invoked_payloads.is_empty());
    assert_eq!(app.state, ApplicationState::Approved);
    assert_eq!(app.efgp_serial_no.as_deref(), Some("stamp555"));
}

#[tokio::test]
async fn test_submit_remote_rejection_leaves_state_unchanged() {
    let config = test_config("submit_fail");
    let fake = Arc::new(FakeWorkflowService {
        invoke_error: Some("流程定义不存在".to_string()),
        ..FakeWorkflowService::default()
    });
    let flow = SubmitFlow::new(&config, fake.clone());

    let mut app = draft_app("SA2024103");
    let err = flow.run(&mut app).await.unwrap_err();

    assert!(matches!(err, AppError::Submission(_)));
    assert!(err.to_string().contains("流程定义不存在"));
    // 此路径上本地状态不发生任何变化
    assert_eq!(app.state, ApplicationState::Draft);
    assert!(app.efgp_serial_no.is_none());
    assert!(app.history.is_empty());
}

#[tokio::test]
async fn test_submit_template_unreachable_aborts_before_invoke() {
    let config = test_config("submit_tpl");
    let fake = Arc::new(FakeWorkflowService {
        template_error: Some(503),
        ..FakeWorkflowService::default()
    });
    let flow = SubmitFlow::new(&config, fake.clone());

    let mut app = draft_app("SA2024104");
    let err = flow.run(&mut app).await.unwrap_err();

    assert!(matches!(err, AppError::Remote(_)));
    assert_eq!(app.state, ApplicationState::Draft);
    assert!(fake.calls.lock().unwrap().invoked_payloads.is_empty());
}

#[tokio::test]
async fn test_submit_empty_form_oid_is_malformed() {
    let config = test_config("submit_oid");
    let fake = Arc::new(FakeWorkflowService {
        form_oid: "   ".to_string(),
        ..FakeWorkflowService::default()
    });
    let flow = SubmitFlow::new(&config, fake.clone());

    let mut app = draft_app("SA2024105");
    let err = flow.run(&mut app).await.unwrap_err();
    assert!(matches!(err, AppError::Remote(_)));
    assert_eq!(app.state, ApplicationState::Draft);
}

#[tokio::test]
async fn test_submit_without_serial_in_reply_still_succeeds() {
    let config = test_config("submit_noserial");
    let fake = Arc::new(FakeWorkflowService {
        invoke_reply: "流程已启动，但没有序号".to_string(),
        ..FakeWorkflowService::default()
    });
    let flow = SubmitFlow::new(&config, fake.clone());

    let mut app = draft_app("SA2024106");
    let message = flow.run(&mut app).await.expect("无序号不算失败");

    assert_eq!(app.state, ApplicationState::Submitted);
    assert!(app.efgp_serial_no.is_none());
    assert!(message.contains("未取得"));
}

#[test]
fn test_extract_serial_pattern() {
    assert_eq!(
        extract_serial("启动成功 serialNo=stamp20240815001 完毕").as_deref(),
        Some("stamp20240815001")
    );
    assert_eq!(extract_serial("启动成功，无序号"), None);
    assert_eq!(extract_serial("prefix stampX123"), None);
}
