pub mod log_store;
pub mod storage;

pub use log_store::LogStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
