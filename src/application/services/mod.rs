pub mod object_store;
pub mod upload_service;
pub mod upload_validator;
