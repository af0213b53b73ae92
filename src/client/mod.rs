//! Exchange service client: the only component that performs network I/O.
//!
//! Both controllers depend on [`ExchangeApi`] and never on each other.
//! Status-code classification lives in pure functions so the error
//! mapping is testable without a server.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::common::{AppConfig, ExchangeError};

/// Payload for one upload attempt. The password is sent once and never
/// stored by the client afterwards.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Bytes,
    pub password: Option<String>,
}

/// Successful upload result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub short_id: String,
    pub download_url: Option<String>,
    pub message: Option<String>,
}

/// Result of a metadata lookup for a short identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub exists: bool,
    pub is_password_protected: bool,
}

/// Time-limited URL that directly serves the file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalTicket {
    pub url: String,
}

/// Operations the exchange service exposes to this client.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt, ExchangeError>;
    async fn get_metadata(&self, id: &str) -> Result<FileMetadata, ExchangeError>;
    async fn retrieve(
        &self,
        id: &str,
        password: Option<&str>,
    ) -> Result<RetrievalTicket, ExchangeError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    #[serde(default)]
    short_file_id: String,
    download_url: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataResponse {
    success: bool,
    #[serde(default)]
    is_password_protected: bool,
}

#[derive(Deserialize)]
struct DownloadResponse {
    success: bool,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Maps an upload failure status to an error kind.
/// 413 = oversize, 400 = validation (server message verbatim), other = transient.
fn classify_upload_failure(status: StatusCode, message: Option<String>) -> ExchangeError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => ExchangeError::oversize(message),
        StatusCode::BAD_REQUEST => {
            ExchangeError::validation(message.unwrap_or_else(|| "Invalid upload.".to_string()))
        }
        _ => ExchangeError::transient(message),
    }
}

/// Maps a metadata lookup failure status to an error kind.
fn classify_metadata_failure(status: StatusCode, message: Option<String>) -> ExchangeError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => ExchangeError::not_found(message),
        _ => ExchangeError::transient(message),
    }
}

/// Maps a retrieval failure status to an error kind.
/// 403 = access denied (server message verbatim), other = transient.
fn classify_retrieve_failure(status: StatusCode, message: Option<String>) -> ExchangeError {
    match status {
        StatusCode::FORBIDDEN => ExchangeError::access_denied(message),
        StatusCode::NOT_FOUND | StatusCode::GONE => ExchangeError::not_found(message),
        _ => ExchangeError::transient(message),
    }
}

/// HTTP implementation of [`ExchangeApi`] over reqwest.
pub struct HttpExchangeClient {
    client: Client,
    base_url: String,
}

impl HttpExchangeClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api.url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Extracts the `message` field from an error body, if any.
async fn error_message(response: reqwest::Response) -> Option<String> {
    let text = response.text().await.ok()?;
    serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
}

#[async_trait]
impl ExchangeApi for HttpExchangeClient {
    async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt, ExchangeError> {
        let mut form = multipart::Form::new().part(
            "file",
            multipart::Part::bytes(request.bytes.to_vec()).file_name(request.file_name.clone()),
        );
        if let Some(password) = request.password {
            form = form.text("password", password);
        }

        let url = self.build_url("/api/v1/upload");
        debug!(file = %request.file_name, size = request.bytes.len(), "uploading file");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| ExchangeError::transient(Some(err.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_upload_failure(status, error_message(response).await));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|err| ExchangeError::transient(Some(err.to_string())))?;

        if !body.success {
            return Err(ExchangeError::transient(body.message));
        }

        Ok(UploadReceipt {
            short_id: body.short_file_id,
            download_url: body.download_url,
            message: body.message,
        })
    }

    async fn get_metadata(&self, id: &str) -> Result<FileMetadata, ExchangeError> {
        let url = self.build_url(&format!("/api/v1/files/{id}"));
        debug!(%id, "looking up file metadata");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| ExchangeError::transient(Some(err.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_metadata_failure(
                status,
                error_message(response).await,
            ));
        }

        let body: MetadataResponse = response
            .json()
            .await
            .map_err(|err| ExchangeError::transient(Some(err.to_string())))?;

        if !body.success {
            return Err(ExchangeError::transient(None));
        }

        Ok(FileMetadata {
            exists: true,
            is_password_protected: body.is_password_protected,
        })
    }

    async fn retrieve(
        &self,
        id: &str,
        password: Option<&str>,
    ) -> Result<RetrievalTicket, ExchangeError> {
        let url = self.build_url("/api/v1/download");
        debug!(%id, protected = password.is_some(), "requesting retrieval URL");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "id": id, "password": password }))
            .send()
            .await
            .map_err(|err| ExchangeError::transient(Some(err.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_retrieve_failure(
                status,
                error_message(response).await,
            ));
        }

        let body: DownloadResponse = response
            .json()
            .await
            .map_err(|err| ExchangeError::transient(Some(err.to_string())))?;

        if !body.success || body.url.is_empty() {
            return Err(ExchangeError::transient(None));
        }

        Ok(RetrievalTicket { url: body.url })
    }
}
