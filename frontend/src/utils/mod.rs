pub mod money;
pub mod navigation;
pub mod storage;
pub mod time;
