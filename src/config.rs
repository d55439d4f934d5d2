/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 是否启用 EFGP 整合
    pub efgp_enabled: bool,
    /// EFGP WorkflowService 端点
    pub efgp_endpoint: String,
    /// EFGP 流程包 ID
    pub process_id: String,
    /// 送签人工号
    pub requester_id: String,
    /// 送签部门代码
    pub org_unit_id: String,
    /// EFGP 文件服务器共享目录根路径
    pub efgp_share_root: String,
    /// 附件二次上传候选端点（按顺序尝试，支持 {filePath}/{physicalName} 占位符）
    pub upload_endpoints: Vec<String>,
    /// 申请单 TOML 存放目录
    pub record_folder: String,
    /// 签核轨迹日志目录
    pub audit_folder: String,
    /// 远端调用超时（秒）
    pub request_timeout_secs: u64,
    /// 连线测试超时（秒）
    pub probe_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            efgp_enabled: true,
            efgp_endpoint: "http://192.168.3.229:8086/NaNaWeb/services/WorkflowService"
                .to_string(),
            process_id: "stamp".to_string(),
            requester_id: "T1699".to_string(),
            org_unit_id: "R39A".to_string(),
            efgp_share_root: r"\\192.168.3.229\BPMTest\wildfly-15.0.0.Final\modules\NaNa\DocServer\document".to_string(),
            upload_endpoints: vec![
                "http://192.168.3.229:8086/NaNaWeb/DownloadFile/upload?filePath={filePath}&physicalName={physicalName}".to_string(),
                "http://192.168.3.229:8086/NaNaWeb/api/v1/system/uploadfile?filePath={filePath}&physicalName={physicalName}".to_string(),
                "http://192.168.3.229:8086/NaNaWeb/upload".to_string(),
            ],
            record_folder: "records".to_string(),
            audit_folder: "audit".to_string(),
            request_timeout_secs: 30,
            probe_timeout_secs: 5,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            efgp_enabled: std::env::var("EFGP_ENABLED").ok().and_then(|v| v.parse().ok()).unwrap_or(default.efgp_enabled),
            efgp_endpoint: std::env::var("EFGP_ENDPOINT").unwrap_or(default.efgp_endpoint),
            process_id: std::env::var("EFGP_PROCESS_ID").unwrap_or(default.process_id),
            requester_id: std::env::var("EFGP_REQUESTER_ID").unwrap_or(default.requester_id),
            org_unit_id: std::env::var("EFGP_ORG_UNIT_ID").unwrap_or(default.org_unit_id),
            efgp_share_root: std::env::var("EFGP_SHARE_ROOT").unwrap_or(default.efgp_share_root),
            upload_endpoints: std::env::var("EFGP_UPLOAD_ENDPOINTS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.upload_endpoints),
            record_folder: std::env::var("RECORD_FOLDER").unwrap_or(default.record_folder),
            audit_folder: std::env::var("AUDIT_FOLDER").unwrap_or(default.audit_folder),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            probe_timeout_secs: std::env::var("PROBE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.probe_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
