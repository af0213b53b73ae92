pub mod controller;
pub mod session;

pub use controller::UploadController;
pub use session::{UploadOutcome, UploadSession, UploadStatus};
