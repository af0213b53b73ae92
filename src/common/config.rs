//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config < environment < CLI
use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validate::{IdPolicy, UploadPolicy};

/// Server-side retention window; surfaced in user messages only.
pub const RETENTION_WINDOW_HOURS: u64 = 24;

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;
const MAX_TIMEOUT_SECS: u64 = 300;

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "linkdrop")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("linkdrop.toml"))
}

/// Exchange service endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the exchange service.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Client-side size ceiling in bytes.
    pub limit: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DownloadSettings {
    /// Accepted identifier character class.
    pub policy: IdPolicy,
}

/// Fully resolved application configuration after all layers merge.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub upload: UploadSettings,
    pub download: DownloadSettings,
}

impl AppConfig {
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_bytes: self.upload.limit,
        }
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.download.policy
    }

    /// Validates endpoint and limit bounds and rejects unusable values.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.api.url.starts_with("http://") || self.api.url.starts_with("https://"),
            "Invalid config: api.url must start with http:// or https://"
        );
        ensure!(
            self.api.timeout >= 1,
            "Invalid config: api.timeout must be >= 1"
        );
        ensure!(
            self.api.timeout <= MAX_TIMEOUT_SECS,
            "Invalid config: api.timeout must be <= {MAX_TIMEOUT_SECS}"
        );
        ensure!(
            self.upload.limit >= 1,
            "Invalid config: upload.limit must be >= 1"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Loads config from defaults/file/env.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path();

    let config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("LINKDROP_").split("_"))
        .extract()
        .context("Failed to load configuration")?;

    config.validate()?;

    Ok(config)
}

/// Applies runtime overrides to a loaded config.
pub fn apply_overrides(mut config: AppConfig, overrides: &ConfigOverrides) -> AppConfig {
    if let Some(url) = &overrides.api_url {
        config.api.url = url.trim_end_matches('/').to_string();
    }

    config
}
