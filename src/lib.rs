pub mod client;
pub mod common;
pub mod download;
pub mod notify;
pub mod upload;
pub mod validate;
