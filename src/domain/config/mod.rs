pub mod app;
pub mod error;
pub mod policy;
pub mod storage;
