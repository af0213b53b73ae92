//! Upload lifecycle: validate, submit, interpret the result.
//!
//! State machine: Idle -> Validating -> Submitting -> {Succeeded | Failed},
//! with both terminal states resettable back to Idle. There is no
//! automatic retry; every retry is a fresh explicit `submit()`.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::{ExchangeApi, UploadReceipt, UploadRequest};
use crate::common::ExchangeError;
use crate::notify::Notify;
use crate::upload::session::{UploadOutcome, UploadSession, UploadStatus};
use crate::validate::{self, FileCandidate, UploadPolicy};

/// Owns one [`UploadSession`] for the duration of a user workflow.
pub struct UploadController {
    session: UploadSession,
    /// Bumped on every reset; responses issued under an older value
    /// are discarded instead of resurrecting a cleared session.
    generation: u64,
    client: Arc<dyn ExchangeApi>,
    notify: Arc<dyn Notify>,
    policy: UploadPolicy,
}

impl UploadController {
    pub fn new(client: Arc<dyn ExchangeApi>, notify: Arc<dyn Notify>, policy: UploadPolicy) -> Self {
        Self {
            session: UploadSession::new(),
            generation: 0,
            client,
            notify,
            policy,
        }
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records the upload candidate. Does not transition state.
    pub fn select_file(&mut self, file: FileCandidate) {
        if self.session.status == UploadStatus::Submitting {
            warn!("file selection ignored while an upload is in flight");
            return;
        }
        debug!(name = %file.name, size = file.size, "file selected");
        self.session.selected_file = Some(file);
    }

    pub fn set_password_protection(&mut self, enabled: bool) {
        if !self.session.accepts_input() {
            warn!("password protection change ignored in current state");
            return;
        }
        self.session.password_protection = enabled;
        if !enabled {
            self.session.password = None;
        }
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        if !self.session.accepts_input() {
            warn!("password change ignored in current state");
            return;
        }
        self.session.password = Some(value.into());
    }

    /// Validates the session and, if it passes, submits the upload.
    ///
    /// A rejected validation transitions to `Failed` without any
    /// network call. A second invocation while submitting is a no-op.
    pub async fn submit(&mut self) {
        if self.session.status == UploadStatus::Submitting {
            warn!("submit ignored: an upload is already in flight");
            return;
        }

        self.session.status = UploadStatus::Validating;
        self.session.result = None;
        self.session.last_error = None;

        if let Err(err) = self.validate() {
            debug!(kind = err.kind(), "upload rejected before submission");
            self.fail(err);
            return;
        }

        // validate() guarantees the file is present
        let Some(file) = self.session.selected_file.clone() else {
            self.fail(ExchangeError::validation("No file selected."));
            return;
        };

        // sent once, never stored after submission
        let password = if self.session.password_protection {
            self.session.password.take()
        } else {
            None
        };

        self.session.status = UploadStatus::Submitting;
        let issued_generation = self.generation;

        let outcome = self
            .client
            .upload(UploadRequest {
                file_name: file.name,
                bytes: file.bytes,
                password,
            })
            .await;

        self.apply_upload_result(issued_generation, outcome);
    }

    /// Applies an upload response, unless the session was reset while
    /// the request was in flight.
    pub fn apply_upload_result(
        &mut self,
        issued_generation: u64,
        outcome: Result<UploadReceipt, ExchangeError>,
    ) {
        if issued_generation != self.generation {
            debug!(
                issued_generation,
                current = self.generation,
                "discarding stale upload response"
            );
            return;
        }

        match outcome {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| "File uploaded successfully!".to_string());
                self.session.status = UploadStatus::Succeeded;
                self.session.result = Some(UploadOutcome {
                    short_id: receipt.short_id,
                    download_url: receipt.download_url,
                    message: message.clone(),
                });
                self.notify.success(&message);
            }
            Err(err) => {
                debug!(kind = err.kind(), "upload failed");
                self.fail(err);
            }
        }
    }

    /// Returns to `Idle`, clearing file, password, protection flag, and
    /// any recorded outcome.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.session = UploadSession::new();
    }

    fn validate(&self) -> Result<(), ExchangeError> {
        validate::validate_upload_candidate(self.session.selected_file.as_ref(), &self.policy)?;
        validate::validate_password(
            self.session.password.as_deref().unwrap_or(""),
            self.session.password_protection,
        )?;
        Ok(())
    }

    fn fail(&mut self, err: ExchangeError) {
        self.notify.error(err.message());
        self.session.status = UploadStatus::Failed;
        self.session.last_error = Some(err);
    }
}
