//! Download session record, keyed by a user-supplied identifier.

use crate::client::FileMetadata;
use crate::common::ExchangeError;

/// Where the download attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadStatus {
    #[default]
    Idle,
    LookingUp,
    AwaitingPassword,
    Verifying,
    Ready,
    NotFound,
    Error,
}

/// State for a single download attempt.
///
/// Invariants: `AwaitingPassword` implies the metadata lookup reported
/// a password-protected file; `Ready` implies a non-empty retrieval URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DownloadSession {
    /// Normalized identifier, set once validation passes.
    pub identifier: Option<String>,
    /// Absent until the metadata lookup completes.
    pub metadata: Option<FileMetadata>,
    /// Incremented on each rejected password. Never reset except by an
    /// explicit session reset; counted for display only — the server
    /// is the authority on throttling.
    pub password_attempts: u32,
    pub status: DownloadStatus,
    /// Present only when `status == Ready`.
    pub retrieval_url: Option<String>,
    pub last_error: Option<ExchangeError>,
}

impl DownloadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_password_protected(&self) -> bool {
        self.metadata.is_some_and(|m| m.is_password_protected)
    }
}
