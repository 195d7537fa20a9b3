pub mod context;
pub mod format;
pub mod storage;
