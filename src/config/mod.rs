#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{GalleryError, Result};
use crate::utils::validation::{validate_url, Validate};

pub use crate::core::upload::DEFAULT_BUCKET;

pub const DEFAULT_STORAGE_BACKEND: &str = "local";
pub const DEFAULT_STORAGE_PATH: &str = "./storage";
pub const STORAGE_BACKENDS: [&str; 2] = ["local", "s3"];

/// Which record source a resolved configuration points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    Snapshot(String),
    Rest { api_url: String, api_key: String },
}

/// Effective configuration: explicit values from the primary layer win over
/// the file layer, which wins over built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub snapshot_path: Option<String>,
    pub storage_backend: String,
    pub storage_path: String,
    pub bucket: String,
    pub public_base_url: Option<String>,
}

impl Settings {
    /// `explicit` holds only values the user actually set; `fallback` fills gaps.
    pub fn layered(explicit: &PartialSettings, fallback: &dyn ConfigProvider) -> Self {
        let or_fallback = |value: &Option<String>, other: Option<&str>| {
            value.clone().or_else(|| other.map(str::to_string))
        };

        Self {
            api_url: or_fallback(&explicit.api_url, fallback.api_url()),
            api_key: or_fallback(&explicit.api_key, fallback.api_key()),
            snapshot_path: or_fallback(&explicit.snapshot_path, fallback.snapshot_path()),
            storage_backend: explicit
                .storage_backend
                .clone()
                .unwrap_or_else(|| fallback.storage_backend().to_string()),
            storage_path: explicit
                .storage_path
                .clone()
                .unwrap_or_else(|| fallback.storage_path().to_string()),
            bucket: explicit
                .bucket
                .clone()
                .unwrap_or_else(|| fallback.bucket().to_string()),
            public_base_url: or_fallback(&explicit.public_base_url, fallback.public_base_url()),
        }
    }

    pub fn from_provider(provider: &dyn ConfigProvider) -> Self {
        Self::layered(&PartialSettings::default(), provider)
    }

    /// A snapshot path wins over the API when both are configured.
    pub fn source_selection(&self) -> Result<SourceSelection> {
        if let Some(path) = &self.snapshot_path {
            return Ok(SourceSelection::Snapshot(path.clone()));
        }

        let api_url = self
            .api_url
            .clone()
            .ok_or_else(|| GalleryError::MissingConfigError {
                field: "api_url".to_string(),
            })?;
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| GalleryError::MissingConfigError {
                field: "api_key".to_string(),
            })?;

        Ok(SourceSelection::Rest { api_url, api_key })
    }
}

/// Values set on the command line, before defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct PartialSettings {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub snapshot_path: Option<String>,
    pub storage_backend: Option<String>,
    pub storage_path: Option<String>,
    pub bucket: Option<String>,
    pub public_base_url: Option<String>,
}

#[cfg(feature = "cli")]
impl From<&cli::CliConfig> for PartialSettings {
    fn from(cli: &cli::CliConfig) -> Self {
        Self {
            api_url: cli.api_url.clone(),
            api_key: cli.api_key.clone(),
            snapshot_path: cli.snapshot.clone(),
            storage_backend: cli.storage_backend.clone(),
            storage_path: cli.storage_path.clone(),
            bucket: cli.bucket.clone(),
            public_base_url: cli.public_base_url.clone(),
        }
    }
}

impl ConfigProvider for Settings {
    fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn snapshot_path(&self) -> Option<&str> {
        self.snapshot_path.as_deref()
    }

    fn storage_backend(&self) -> &str {
        &self.storage_backend
    }

    fn storage_path(&self) -> &str {
        &self.storage_path
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::{validate_non_empty_string, validate_one_of, validate_path};

        if let Some(url) = &self.api_url {
            validate_url("api_url", url)?;
        }
        if let Some(path) = &self.snapshot_path {
            validate_path("snapshot_path", path)?;
        }
        validate_one_of("storage_backend", &self.storage_backend, &STORAGE_BACKENDS)?;
        validate_path("storage_path", &self.storage_path)?;
        validate_non_empty_string("bucket", &self.bucket)?;
        if let Some(url) = &self.public_base_url {
            validate_url("public_base_url", url)?;
        }
        Ok(())
    }
}
