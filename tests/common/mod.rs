#![allow(dead_code)]

pub mod config_test_utils;
pub mod mock_client;

use bytes::Bytes;
use linkdrop::client::{FileMetadata, RetrievalTicket, UploadReceipt};
use linkdrop::validate::FileCandidate;

/// In-memory upload candidate with real bytes.
pub fn small_file(name: &str, len: usize) -> FileCandidate {
    FileCandidate::new(name, Bytes::from(vec![7u8; len]))
}

/// Candidate with a declared size but no backing bytes. Oversize
/// candidates never reach the wire, so the bytes are never read.
pub fn sized_candidate(name: &str, size: u64) -> FileCandidate {
    FileCandidate {
        name: name.to_string(),
        size,
        bytes: Bytes::new(),
    }
}

pub fn receipt(short_id: &str) -> UploadReceipt {
    UploadReceipt {
        short_id: short_id.to_string(),
        download_url: Some(format!("https://files.example.com/download/{short_id}")),
        message: None,
    }
}

pub fn metadata(protected: bool) -> FileMetadata {
    FileMetadata {
        exists: true,
        is_password_protected: protected,
    }
}

pub fn ticket(url: &str) -> RetrievalTicket {
    RetrievalTicket {
        url: url.to_string(),
    }
}
