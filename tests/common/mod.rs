#![allow(dead_code)]
//! 测试共用设施：内存假 WorkflowService 与申请单构造器

use async_trait::async_trait;
use chrono::NaiveDate;
use stamp_submit::clients::InvokeProcessRequest;
use stamp_submit::{
    ApplicationState, Attachment, Config, RemoteError, ReservedSlot, StampApplication,
    WorkflowService,
};
use std::path::PathBuf;
use std::sync::Mutex;

/// 典型的表单字段模板（与远端 getFormFieldTemplate 回应同构）
pub const TEMPLATE_XML: &str = r#"<stamp><field id="SerialNumber1"/><field id="itemno"></field><field id="Date4"/><field id="odoouser"/><field id="subject"/><field id="note"/><field id="other">保持原值</field></stamp>"#;

/// 假 WorkflowService 记录到的调用
#[derive(Debug, Default)]
pub struct CallLog {
    pub reserves: Vec<String>,
    pub invoked_payloads: Vec<String>,
    pub invoked_subjects: Vec<String>,
    pub history_queries: Vec<String>,
    pub status_queries: Vec<String>,
}

/// 内存假 WorkflowService
///
/// 各操作返回预先设定的回应；`*_error` 为 Some 时该操作返回错误。
pub struct FakeWorkflowService {
    pub form_oid: String,
    pub template: String,
    pub invoke_reply: String,
    pub invoke_error: Option<String>,
    pub template_error: Option<u16>,
    pub reserve_error: Option<String>,
    pub history_xml: String,
    pub history_error: Option<String>,
    pub status_xml: String,
    pub calls: Mutex<CallLog>,
}

impl Default for FakeWorkflowService {
    fn default() -> Self {
        Self {
            form_oid: "FORM-OID-001".to_string(),
            template: TEMPLATE_XML.to_string(),
            invoke_reply: "流程已启动，序号 stamp20240001".to_string(),
            invoke_error: None,
            template_error: None,
            reserve_error: None,
            history_xml: "<result/>".to_string(),
            history_error: None,
            status_xml: "<result><state></state></result>".to_string(),
            calls: Mutex::new(CallLog::default()),
        }
    }
}

#[async_trait]
impl WorkflowService for FakeWorkflowService {
    async fn find_form_oids_of_process(
        &self,
        _process_package_id: &str,
    ) -> Result<String, RemoteError> {
        Ok(self.form_oid.clone())
    }

    async fn get_form_field_template(
        &self,
        _form_definition_oid: &str,
    ) -> Result<String, RemoteError> {
        if let Some(status) = self.template_error {
            return Err(RemoteError::Http { status });
        }
        Ok(self.template.clone())
    }

    async fn reserve_no_cm_document(
        &self,
        original_file_name: &str,
    ) -> Result<ReservedSlot, RemoteError> {
        if let Some(message) = &self.reserve_error {
            return Err(RemoteError::Fault {
                message: message.clone(),
            });
        }
        let mut calls = self.calls.lock().unwrap();
        calls.reserves.push(original_file_name.to_string());
        let n = calls.reserves.len();
        Ok(ReservedSlot {
            doc_server_id: "DS1".to_string(),
            file_path: format!("2024/07/{:02}", n),
            physical_name: format!("phys{:04}", n),
            oid: format!("oid{:04}", n),
        })
    }

    async fn invoke_process_and_add_cust_act(
        &self,
        request: &InvokeProcessRequest<'_>,
    ) -> Result<String, RemoteError> {
        if let Some(message) = &self.invoke_error {
            return Err(RemoteError::Fault {
                message: message.clone(),
            });
        }
        let mut calls = self.calls.lock().unwrap();
        calls.invoked_payloads.push(request.form_field_value.to_string());
        calls.invoked_subjects.push(request.subject.to_string());
        Ok(self.invoke_reply.clone())
    }

    async fn fetch_full_proc_instance_with_serial_no(
        &self,
        serial_no: &str,
    ) -> Result<String, RemoteError> {
        if let Some(message) = &self.history_error {
            return Err(RemoteError::Fault {
                message: message.clone(),
            });
        }
        self.calls
            .lock()
            .unwrap()
            .history_queries
            .push(serial_no.to_string());
        Ok(self.history_xml.clone())
    }

    async fn fetch_proc_instance_with_serial_no(
        &self,
        serial_no: &str,
    ) -> Result<String, RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .status_queries
            .push(serial_no.to_string());
        Ok(self.status_xml.clone())
    }
}

/// 每个测试独立的临时工作目录
pub fn test_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "stamp_submit_test_{}_{}",
        tag,
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("创建测试目录失败");
    dir
}

/// 测试配置：共享目录与轨迹目录指向临时目录，不带上传端点
pub fn test_config(tag: &str) -> Config {
    let dir = test_dir(tag);
    Config {
        efgp_share_root: dir.join("share").display().to_string(),
        upload_endpoints: Vec::new(),
        record_folder: dir.join("records").display().to_string(),
        audit_folder: dir.join("audit").display().to_string(),
        output_log_file: dir.join("output.txt").display().to_string(),
        ..Config::default()
    }
}

/// 草稿状态的申请单
pub fn draft_app(name: &str) -> StampApplication {
    StampApplication {
        name: name.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 7, 15).expect("日期"),
        applicant: "王小明".to_string(),
        document_name: "合约A".to_string(),
        description: "合约用印".to_string(),
        efgp_serial_no: None,
        state: ApplicationState::Draft,
        attachments: Vec::new(),
        history: Vec::new(),
    }
}

/// 在测试目录里落地一个附件文件
pub fn attachment_file(tag: &str, file_name: &str, content: &[u8]) -> Attachment {
    let dir = test_dir(tag).join("files");
    std::fs::create_dir_all(&dir).expect("创建附件目录失败");
    let path = dir.join(file_name);
    std::fs::write(&path, content).expect("写入附件失败");
    Attachment {
        name: file_name.to_string(),
        mimetype: Some("application/pdf".to_string()),
        path,
    }
}
