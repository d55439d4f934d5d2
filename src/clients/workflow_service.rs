//! EFGP WorkflowService 能力接口
//!
//! 送签与同步流程只依赖这个 trait，不直接依赖 SOAP 实现，
//! 测试时可注入内存假实现。

use async_trait::async_trait;
use thiserror::Error;

/// 远端 EFGP 调用错误
#[derive(Debug, Error)]
pub enum RemoteError {
    /// 无法连接远端服务
    #[error("无法连接 EFGP 服务 ({endpoint}): {source}")]
    Unavailable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 回应不是可解析的结构化内容
    #[error("EFGP 回应无法解析 ({what}): {detail}")]
    Malformed { what: &'static str, detail: String },
    /// 远端返回非成功状态码
    #[error("EFGP 服务返回 HTTP {status}")]
    Http { status: u16 },
    /// SOAP Fault
    #[error("EFGP 服务错误: {message}")]
    Fault { message: String },
}

/// `reserveNoCmDocument` 返回的文件预留信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedSlot {
    /// 文件服务器 ID
    pub doc_server_id: String,
    /// 相对存放路径
    pub file_path: String,
    /// 远端生成的实体文件名（不含扩展名）
    pub physical_name: String,
    /// 文件对象 OID
    pub oid: String,
}

/// `invokeProcessAndAddCustAct` 的调用参数
#[derive(Debug, Clone, Copy)]
pub struct InvokeProcessRequest<'a> {
    pub process_package_id: &'a str,
    pub requester_id: &'a str,
    pub org_unit_id: &'a str,
    pub form_def_oid: &'a str,
    pub form_field_value: &'a str,
    pub subject: &'a str,
    pub post_acts_xml: &'a str,
}

/// EFGP WorkflowService 的六个操作
#[async_trait]
pub trait WorkflowService: Send + Sync {
    /// 取得流程对应的表单定义 OID
    async fn find_form_oids_of_process(
        &self,
        process_package_id: &str,
    ) -> Result<String, RemoteError>;

    /// 取得表单字段模板 XML
    async fn get_form_field_template(
        &self,
        form_definition_oid: &str,
    ) -> Result<String, RemoteError>;

    /// 预留文件空间，返回存放路径与实体文件名
    async fn reserve_no_cm_document(
        &self,
        original_file_name: &str,
    ) -> Result<ReservedSlot, RemoteError>;

    /// 启动流程实例，返回远端结果文本
    async fn invoke_process_and_add_cust_act(
        &self,
        request: &InvokeProcessRequest<'_>,
    ) -> Result<String, RemoteError>;

    /// 以序号查询完整流程实例（含签核历程）XML
    async fn fetch_full_proc_instance_with_serial_no(
        &self,
        serial_no: &str,
    ) -> Result<String, RemoteError>;

    /// 以序号查询流程实例基本状态 XML
    async fn fetch_proc_instance_with_serial_no(
        &self,
        serial_no: &str,
    ) -> Result<String, RemoteError>;
}
