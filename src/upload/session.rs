//! Upload session record: one upload attempt from selection to outcome.

use crate::common::ExchangeError;
use crate::validate::FileCandidate;

/// Where the upload attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Present only once the upload succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub short_id: String,
    pub download_url: Option<String>,
    pub message: String,
}

/// State for a single upload attempt.
///
/// Mutated only by user input events and exchange responses. The
/// password is held until submission and taken off the session when
/// the request is built; it is never retained afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadSession {
    pub selected_file: Option<FileCandidate>,
    pub password_protection: bool,
    pub(crate) password: Option<String>,
    pub status: UploadStatus,
    pub result: Option<UploadOutcome>,
    pub last_error: Option<ExchangeError>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether user input may still mutate this session.
    pub fn accepts_input(&self) -> bool {
        matches!(self.status, UploadStatus::Idle | UploadStatus::Failed)
    }
}
