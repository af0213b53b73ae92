//! Download lifecycle: identifier lookup, password gate, retrieval.
//!
//! State machine: Idle -> LookingUp -> {NotFound | Error |
//! AwaitingPassword | Verifying -> Ready}. The lookup runs before any
//! password prompt so a nonexistent identifier never asks for one, and
//! never leaks whether it would have been protected.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::{ExchangeApi, FileMetadata, RetrievalTicket};
use crate::common::ExchangeError;
use crate::download::session::{DownloadSession, DownloadStatus};
use crate::notify::Notify;
use crate::validate::{self, IdPolicy};

/// Owns one [`DownloadSession`] for the duration of a user workflow.
pub struct DownloadResolver {
    session: DownloadSession,
    /// Bumped on every reset; responses issued under an older value
    /// are discarded instead of resurrecting a cleared session.
    generation: u64,
    client: Arc<dyn ExchangeApi>,
    notify: Arc<dyn Notify>,
    id_policy: IdPolicy,
}

impl DownloadResolver {
    pub fn new(client: Arc<dyn ExchangeApi>, notify: Arc<dyn Notify>, id_policy: IdPolicy) -> Self {
        Self {
            session: DownloadSession::new(),
            generation: 0,
            client,
            notify,
            id_policy,
        }
    }

    pub fn session(&self) -> &DownloadSession {
        &self.session
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn in_flight(&self) -> bool {
        matches!(
            self.session.status,
            DownloadStatus::LookingUp | DownloadStatus::Verifying
        )
    }

    /// Normalizes the identifier and looks up its metadata. Invalid
    /// input goes straight to `Error` without a network call. An
    /// unprotected file proceeds directly to retrieval; a protected one
    /// stops at `AwaitingPassword`.
    pub async fn resolve(&mut self, raw_id: &str) {
        if self.in_flight() {
            warn!("resolve ignored: a request is already in flight");
            return;
        }

        let id = match validate::validate_identifier(raw_id, self.id_policy) {
            Ok(id) => id,
            Err(err) => {
                debug!(kind = err.kind(), "identifier rejected before lookup");
                self.notify.error(err.message());
                self.session.status = DownloadStatus::Error;
                self.session.last_error = Some(err);
                return;
            }
        };

        // A fresh lookup clears the previous file's traces but keeps
        // the attempt counter; only reset() clears that.
        self.session.identifier = Some(id.clone());
        self.session.metadata = None;
        self.session.retrieval_url = None;
        self.session.last_error = None;
        self.session.status = DownloadStatus::LookingUp;

        let issued_generation = self.generation;
        let outcome = self.client.get_metadata(&id).await;

        if !self.apply_metadata_result(issued_generation, outcome) {
            return;
        }

        // Unprotected files skip the password state entirely.
        if self.session.status == DownloadStatus::Verifying {
            self.request_retrieval(issued_generation, None).await;
        }
    }

    /// Applies a metadata response. Returns false when the response was
    /// stale and got discarded.
    pub fn apply_metadata_result(
        &mut self,
        issued_generation: u64,
        outcome: Result<FileMetadata, ExchangeError>,
    ) -> bool {
        if issued_generation != self.generation {
            debug!(
                issued_generation,
                current = self.generation,
                "discarding stale metadata response"
            );
            return false;
        }

        match outcome {
            Ok(metadata) => {
                self.session.metadata = Some(metadata);
                if metadata.is_password_protected {
                    self.session.status = DownloadStatus::AwaitingPassword;
                    self.notify.info("This file is password protected.");
                } else {
                    self.session.status = DownloadStatus::Verifying;
                }
            }
            Err(err) => {
                // Lookup failures are all user-correctable: try another id.
                debug!(kind = err.kind(), "metadata lookup failed");
                self.notify.error(err.message());
                self.session.status = DownloadStatus::NotFound;
                self.session.last_error = Some(err);
            }
        }

        true
    }

    /// Submits the password for a protected file. Only valid from
    /// `AwaitingPassword`; anything else is a no-op.
    pub async fn verify_password(&mut self, password: &str) {
        if self.session.status != DownloadStatus::AwaitingPassword {
            warn!(
                status = ?self.session.status,
                "verify_password ignored outside AwaitingPassword"
            );
            return;
        }

        if let Err(err) = validate::validate_password(password, true) {
            // Stay in AwaitingPassword; nothing was sent.
            self.notify.error(err.message());
            return;
        }

        self.session.status = DownloadStatus::Verifying;
        let issued_generation = self.generation;
        self.request_retrieval(issued_generation, Some(password)).await;
    }

    async fn request_retrieval(&mut self, issued_generation: u64, password: Option<&str>) {
        let Some(id) = self.session.identifier.clone() else {
            self.session.status = DownloadStatus::Error;
            self.session.last_error = Some(ExchangeError::validation("No identifier set."));
            return;
        };

        let outcome = self.client.retrieve(&id, password).await;
        self.apply_retrieve_result(issued_generation, outcome);
    }

    /// Applies a retrieval response, unless the session was reset while
    /// the request was in flight.
    pub fn apply_retrieve_result(
        &mut self,
        issued_generation: u64,
        outcome: Result<RetrievalTicket, ExchangeError>,
    ) {
        if issued_generation != self.generation {
            debug!(
                issued_generation,
                current = self.generation,
                "discarding stale retrieval response"
            );
            return;
        }

        match outcome {
            Ok(ticket) => {
                self.session.retrieval_url = Some(ticket.url);
                self.session.status = DownloadStatus::Ready;
                self.notify.success("File ready for download!");
            }
            Err(ExchangeError::AccessDenied(message))
                if self.session.is_password_protected() =>
            {
                self.session.password_attempts += 1;
                self.session.status = DownloadStatus::AwaitingPassword;
                self.notify.error(&format!(
                    "{} ({} failed attempt{})",
                    message,
                    self.session.password_attempts,
                    if self.session.password_attempts == 1 { "" } else { "s" },
                ));
                self.session.last_error = Some(ExchangeError::AccessDenied(message));
            }
            Err(err) => {
                debug!(kind = err.kind(), "retrieval failed");
                self.notify.error(err.message());
                self.session.status = DownloadStatus::Error;
                self.session.last_error = Some(err);
            }
        }
    }

    /// Returns to `Idle`, clearing identifier, metadata, attempts, URL.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.session = DownloadSession::new();
    }
}
