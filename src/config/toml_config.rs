use crate::config::{DEFAULT_BUCKET, DEFAULT_STORAGE_BACKEND, DEFAULT_STORAGE_PATH, STORAGE_BACKENDS};
use crate::core::ConfigProvider;
use crate::utils::error::{GalleryError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub r#type: Option<String>,
    pub path: Option<String>,
    pub bucket: Option<String>,
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GalleryError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GalleryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GalleryError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn api_url(&self) -> Option<&str> {
        self.source.api_url.as_deref()
    }

    fn api_key(&self) -> Option<&str> {
        self.source.api_key.as_deref()
    }

    fn snapshot_path(&self) -> Option<&str> {
        self.source.snapshot_path.as_deref()
    }

    fn storage_backend(&self) -> &str {
        self.storage
            .r#type
            .as_deref()
            .unwrap_or(DEFAULT_STORAGE_BACKEND)
    }

    fn storage_path(&self) -> &str {
        self.storage.path.as_deref().unwrap_or(DEFAULT_STORAGE_PATH)
    }

    fn bucket(&self) -> &str {
        self.storage.bucket.as_deref().unwrap_or(DEFAULT_BUCKET)
    }

    fn public_base_url(&self) -> Option<&str> {
        self.storage.public_base_url.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = self.api_url() {
            validate_url("source.api_url", url)?;
        }
        if let Some(path) = self.snapshot_path() {
            validate_path("source.snapshot_path", path)?;
        }
        validate_one_of("storage.type", self.storage_backend(), &STORAGE_BACKENDS)?;
        validate_path("storage.path", self.storage_path())?;
        validate_non_empty_string("storage.bucket", self.bucket())?;
        if let Some(url) = self.public_base_url() {
            validate_url("storage.public_base_url", url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[source]
api_url = "https://project.supabase.co"
api_key = "anon-key"

[storage]
type = "local"
path = "./uploads"

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_url(), Some("https://project.supabase.co"));
        assert_eq!(config.storage_path(), "./uploads");
        assert_eq!(config.bucket(), "images");
        assert!(config.verbose());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PLATE_GALLERY_TEST_KEY", "secret-service-key");

        let toml_content = r#"
[source]
api_url = "https://project.supabase.co"
api_key = "${PLATE_GALLERY_TEST_KEY}"
snapshot_path = "${PLATE_GALLERY_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("secret-service-key"));
        assert_eq!(config.snapshot_path(), Some("${PLATE_GALLERY_UNSET_VAR}"));

        std::env::remove_var("PLATE_GALLERY_TEST_KEY");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
api_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[storage]
type = "gcs"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\nbucket = \"plates\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.bucket(), "plates");
        assert!(config.api_url().is_none());
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        assert!(TomlConfig::from_toml_str("[source\napi_url = 1").is_err());
    }
}
