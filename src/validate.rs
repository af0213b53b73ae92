//! Pure input validation for both exchange flows.
//!
//! Nothing here touches the network or mutates a session; the
//! controllers call these gates before any request is issued.

use bytes::Bytes;
use indicatif::HumanBytes;
use serde::{Deserialize, Serialize};

use crate::common::ExchangeError;

/// A file the user picked for upload, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
    pub bytes: Bytes,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }
}

/// Upload constraints resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Size ceiling in bytes. The server enforces its own limit as
    /// well; this gate keeps oversize payloads off the wire entirely.
    pub max_bytes: u64,
}

/// Accepted character class for short identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    #[default]
    Digits,
    Alphanumeric,
}

impl IdPolicy {
    fn accepts(self, c: char) -> bool {
        match self {
            IdPolicy::Digits => c.is_ascii_digit(),
            IdPolicy::Alphanumeric => c.is_ascii_alphanumeric(),
        }
    }
}

/// Rejects an absent file or one larger than the policy allows.
pub fn validate_upload_candidate(
    file: Option<&FileCandidate>,
    policy: &UploadPolicy,
) -> Result<(), ExchangeError> {
    let file = file.ok_or_else(|| ExchangeError::validation("No file selected."))?;

    if file.size > policy.max_bytes {
        return Err(ExchangeError::oversize(Some(format!(
            "File is too large: {} exceeds the {} limit.",
            HumanBytes(file.size),
            HumanBytes(policy.max_bytes),
        ))));
    }

    Ok(())
}

/// Strips characters outside the accepted class and rejects inputs
/// that have nothing left afterwards.
pub fn validate_identifier(raw: &str, policy: IdPolicy) -> Result<String, ExchangeError> {
    let normalized: String = raw.chars().filter(|c| policy.accepts(*c)).collect();

    if normalized.is_empty() {
        return Err(ExchangeError::validation(
            "Please enter a valid file ID.",
        ));
    }

    Ok(normalized)
}

/// Rejects an empty password when protection requires one.
pub fn validate_password(candidate: &str, required: bool) -> Result<(), ExchangeError> {
    if required && candidate.is_empty() {
        return Err(ExchangeError::validation("Please enter the password."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(name: &str, size: u64) -> FileCandidate {
        FileCandidate {
            name: name.to_string(),
            size,
            bytes: Bytes::new(),
        }
    }

    #[test]
    fn absent_file_is_rejected() {
        let policy = UploadPolicy { max_bytes: 1024 };
        let err = validate_upload_candidate(None, &policy).unwrap_err();
        assert!(matches!(err, ExchangeError::Validation(_)));
    }

    #[test]
    fn oversize_file_is_rejected_with_oversize_kind() {
        let policy = UploadPolicy { max_bytes: 1024 };
        let err = validate_upload_candidate(Some(&sized("big.bin", 2048)), &policy).unwrap_err();
        assert!(matches!(err, ExchangeError::Oversize(_)));
    }

    #[test]
    fn file_at_exact_limit_is_accepted() {
        let policy = UploadPolicy { max_bytes: 1024 };
        assert!(validate_upload_candidate(Some(&sized("ok.bin", 1024)), &policy).is_ok());
    }

    #[test]
    fn digits_policy_strips_non_digits() {
        assert_eq!(validate_identifier("abc42", IdPolicy::Digits).unwrap(), "42");
        assert_eq!(validate_identifier(" 7 7 ", IdPolicy::Digits).unwrap(), "77");
    }

    #[test]
    fn digits_policy_rejects_letters_only() {
        assert!(validate_identifier("abcdef", IdPolicy::Digits).is_err());
    }

    #[test]
    fn alphanumeric_policy_keeps_letters() {
        assert_eq!(
            validate_identifier("ab-42!", IdPolicy::Alphanumeric).unwrap(),
            "ab42"
        );
    }

    #[test]
    fn empty_identifier_is_rejected() {
        assert!(validate_identifier("", IdPolicy::Digits).is_err());
        assert!(validate_identifier("---", IdPolicy::Alphanumeric).is_err());
    }

    #[test]
    fn password_required_rejects_empty() {
        assert!(validate_password("", true).is_err());
        assert!(validate_password("hunter2", true).is_ok());
        assert!(validate_password("", false).is_ok());
    }

    #[test]
    fn validation_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                validate_identifier("id-99", IdPolicy::Digits).unwrap(),
                "99"
            );
        }
    }
}
