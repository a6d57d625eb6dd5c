pub mod ai;
pub mod clipboard;
pub mod storage;
