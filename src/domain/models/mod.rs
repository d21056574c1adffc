pub mod public_url;
pub mod storage_key;
pub mod upload;
