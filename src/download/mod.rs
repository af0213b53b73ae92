pub mod resolver;
pub mod session;

pub use resolver::DownloadResolver;
pub use session::{DownloadSession, DownloadStatus};
