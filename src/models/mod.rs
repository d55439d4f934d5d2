pub mod application;
pub mod attachment;
pub mod record_store;

pub use application::{ApplicationState, HistoryEntry, StampApplication};
pub use attachment::Attachment;
pub use record_store::RecordStore;
