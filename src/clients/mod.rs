pub mod doc_upload;
pub mod efgp_soap;
pub mod workflow_service;

pub use doc_upload::{DocUploadClient, UploadOutcome};
pub use efgp_soap::EfgpSoapClient;
pub use workflow_service::{InvokeProcessRequest, RemoteError, ReservedSlot, WorkflowService};
