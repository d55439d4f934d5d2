pub mod attachment_transfer;
pub mod audit_writer;
pub mod form_template;
pub mod payload;
pub mod process_query;

pub use attachment_transfer::{AttachmentTransfer, TransferOutcome, TransferResult, TransferStatus};
pub use audit_writer::AuditWriter;
pub use form_template::{fill_template, FormField};
pub use process_query::ProcessStatus;
