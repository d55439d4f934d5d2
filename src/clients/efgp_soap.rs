//! EFGP WorkflowService SOAP 客户端
//!
//! 以 doc/literal 方式封装六个远端操作。连接在客户端内复用，
//! 一般调用带 30 秒超时，连线测试带 5 秒超时。

use crate::clients::workflow_service::{
    InvokeProcessRequest, RemoteError, ReservedSlot, WorkflowService,
};
use crate::config::Config;
use async_trait::async_trait;
use quick_xml::escape::escape;
use std::time::Duration;
use tracing::debug;

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SERVICE_NS: &str = "http://webservice.services.nana.dsc.com";

/// EFGP SOAP 客户端
pub struct EfgpSoapClient {
    endpoint: String,
    http: reqwest::Client,
    request_timeout: Duration,
    probe_timeout: Duration,
}

impl EfgpSoapClient {
    /// 创建新的 EFGP 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.efgp_endpoint.clone(),
            http: reqwest::Client::new(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        }
    }

    /// 连线测试
    ///
    /// 对 WSDL 地址做一次 GET，返回 HTTP 状态码。
    pub async fn test_connection(&self) -> Result<u16, RemoteError> {
        let url = format!("{}?wsdl", self.endpoint);
        let resp = self
            .http
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable {
                endpoint: url.clone(),
                source: e,
            })?;
        Ok(resp.status().as_u16())
    }

    /// 发送一次 SOAP 调用并取出返回文本
    async fn call(&self, operation: &str, params: &[(&str, &str)]) -> Result<String, RemoteError> {
        let envelope = build_envelope(operation, params);
        debug!("SOAP 调用 {}: {} 字符", operation, envelope.len());

        let resp = self
            .http
            .post(&self.endpoint)
            .timeout(self.request_timeout)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(envelope)
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RemoteError::Unavailable {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;

        // SOAP Fault 随 500 返回，优先取 faultstring
        if !status.is_success() {
            if let Some(fault) = extract_fault(&body) {
                return Err(RemoteError::Fault { message: fault });
            }
            return Err(RemoteError::Http {
                status: status.as_u16(),
            });
        }

        extract_return_text(operation, &body)
    }
}

#[async_trait]
impl WorkflowService for EfgpSoapClient {
    async fn find_form_oids_of_process(
        &self,
        process_package_id: &str,
    ) -> Result<String, RemoteError> {
        self.call(
            "findFormOIDsOfProcess",
            &[("pProcessPackageId", process_package_id)],
        )
        .await
    }

    async fn get_form_field_template(
        &self,
        form_definition_oid: &str,
    ) -> Result<String, RemoteError> {
        self.call(
            "getFormFieldTemplate",
            &[("pFormDefinitionOID", form_definition_oid)],
        )
        .await
    }

    async fn reserve_no_cm_document(
        &self,
        original_file_name: &str,
    ) -> Result<ReservedSlot, RemoteError> {
        let xml = self
            .call(
                "reserveNoCmDocument",
                &[("pOriginalFullFileName", original_file_name)],
            )
            .await?;
        parse_reserved_slot(&xml)
    }

    async fn invoke_process_and_add_cust_act(
        &self,
        request: &InvokeProcessRequest<'_>,
    ) -> Result<String, RemoteError> {
        self.call(
            "invokeProcessAndAddCustAct",
            &[
                ("pProcessPackageId", request.process_package_id),
                ("pRequesterId", request.requester_id),
                ("pOrgUnitId", request.org_unit_id),
                ("pFormDefOID", request.form_def_oid),
                ("pFormFieldValue", request.form_field_value),
                ("pSubject", request.subject),
                ("pPostPSActDefsAsXML", request.post_acts_xml),
            ],
        )
        .await
    }

    async fn fetch_full_proc_instance_with_serial_no(
        &self,
        serial_no: &str,
    ) -> Result<String, RemoteError> {
        self.call(
            "fetchFullProcInstanceWithSerialNo",
            &[("pProcessInstanceSerialNo", serial_no)],
        )
        .await
    }

    async fn fetch_proc_instance_with_serial_no(
        &self,
        serial_no: &str,
    ) -> Result<String, RemoteError> {
        self.call(
            "fetchProcInstanceWithSerialNo",
            &[("pProcessInstanceSerialNo", serial_no)],
        )
        .await
    }
}

/// 组装 SOAP 1.1 信封
fn build_envelope(operation: &str, params: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in params {
        body.push_str(&format!("<{}>{}</{}>", name, escape(value), name));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="{}"><soapenv:Body><ser:{} xmlns:ser="{}">{}</ser:{}></soapenv:Body></soapenv:Envelope>"#,
        SOAP_ENVELOPE_NS, operation, SERVICE_NS, body, operation
    )
}

/// 从 SOAP 回应中取出 `<操作名Return>` 的文本内容
fn extract_return_text(operation: &str, body: &str) -> Result<String, RemoteError> {
    let doc = roxmltree::Document::parse(body).map_err(|e| RemoteError::Malformed {
        what: "SOAP 回应",
        detail: e.to_string(),
    })?;

    let return_name = format!("{}Return", operation);
    let node = doc
        .descendants()
        .find(|n| n.tag_name().name() == return_name || n.tag_name().name() == "return");

    match node {
        Some(n) => Ok(n.text().unwrap_or_default().to_string()),
        None => Err(RemoteError::Malformed {
            what: "SOAP 回应",
            detail: format!("找不到 {} 元素", return_name),
        }),
    }
}

/// 取出 SOAP Fault 的 faultstring
fn extract_fault(body: &str) -> Option<String> {
    let doc = roxmltree::Document::parse(body).ok()?;
    doc.descendants()
        .find(|n| n.tag_name().name() == "faultstring")
        .and_then(|n| n.text())
        .map(|s| s.trim().to_string())
}

/// 解析 `reserveNoCmDocument` 返回的预留信息 XML
fn parse_reserved_slot(xml: &str) -> Result<ReservedSlot, RemoteError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| RemoteError::Malformed {
        what: "reserveNoCmDocument 回应",
        detail: e.to_string(),
    })?;

    let text_of = |name: &str| {
        doc.descendants()
            .find(|n| n.tag_name().name() == name)
            .and_then(|n| n.text())
            .unwrap_or_default()
            .to_string()
    };

    Ok(ReservedSlot {
        doc_server_id: text_of("docServerId"),
        file_path: text_of("filePathToSave"),
        physical_name: text_of("physicalName"),
        oid: text_of("OID"),
    })
}
