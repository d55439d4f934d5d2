pub mod submit_ctx;
pub mod submit_flow;
pub mod sync_flow;

pub use submit_ctx::SubmitCtx;
pub use submit_flow::SubmitFlow;
pub use sync_flow::SyncFlow;
