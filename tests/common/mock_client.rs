//! Test doubles: a scripted exchange client and a recording notifier.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use linkdrop::client::{
    ExchangeApi, FileMetadata, RetrievalTicket, UploadReceipt, UploadRequest,
};
use linkdrop::common::ExchangeError;
use linkdrop::notify::Notify;

/// One call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Upload {
        file_name: String,
        size: u64,
        password: Option<String>,
    },
    Metadata {
        id: String,
    },
    Retrieve {
        id: String,
        password: Option<String>,
    },
}

/// Exchange client that replays scripted responses and records every
/// call it receives.
#[derive(Default)]
pub struct MockExchangeClient {
    uploads: Mutex<VecDeque<Result<UploadReceipt, ExchangeError>>>,
    lookups: Mutex<VecDeque<Result<FileMetadata, ExchangeError>>>,
    retrievals: Mutex<VecDeque<Result<RetrievalTicket, ExchangeError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockExchangeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_upload(&self, response: Result<UploadReceipt, ExchangeError>) {
        self.uploads.lock().unwrap().push_back(response);
    }

    pub fn push_metadata(&self, response: Result<FileMetadata, ExchangeError>) {
        self.lookups.lock().unwrap().push_back(response);
    }

    pub fn push_retrieval(&self, response: Result<RetrievalTicket, ExchangeError>) {
        self.retrievals.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ExchangeApi for MockExchangeClient {
    async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt, ExchangeError> {
        self.record(RecordedCall::Upload {
            file_name: request.file_name.clone(),
            size: request.bytes.len() as u64,
            password: request.password.clone(),
        });
        self.uploads
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted upload response")
    }

    async fn get_metadata(&self, id: &str) -> Result<FileMetadata, ExchangeError> {
        self.record(RecordedCall::Metadata { id: id.to_string() });
        self.lookups
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted metadata response")
    }

    async fn retrieve(
        &self,
        id: &str,
        password: Option<&str>,
    ) -> Result<RetrievalTicket, ExchangeError> {
        self.record(RecordedCall::Retrieve {
            id: id.to_string(),
            password: password.map(str::to_string),
        });
        self.retrievals
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted retrieval response")
    }
}

/// Severity recorded by the test notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
    Info,
}

/// Notifier that records every message for assertion.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotifyKind, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(NotifyKind, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, kind: NotifyKind, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|(k, m)| *k == kind && m.contains(needle))
    }
}

impl Notify for RecordingNotifier {
    fn success(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((NotifyKind::Success, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((NotifyKind::Error, message.to_string()));
    }

    fn info(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((NotifyKind::Info, message.to_string()));
    }
}
