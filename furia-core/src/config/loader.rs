//! # Configuration Loader
//!
//! Loads and merges configuration from multiple sources:
//! 1. Default values (lowest priority)
//! 2. Configuration file (middle priority)
//! 3. Environment variables (highest priority)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::error::{FuriaError, Result};

const DEFAULT_ENV_PREFIX: &str = "FURIA";

/// Configuration loader with support for file and environment variable overrides
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Path to configuration file
    config_path: PathBuf,

    /// Environment variable prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

impl ConfigLoader {
    /// Create a new config loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config loader with a specific config file path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Create a config loader with custom environment prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: prefix.into(),
        }
    }

    /// Replace the environment prefix, keeping the path
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Path the loader reads from
    pub fn config_path(&self) -> &std::path::Path {
        &self.config_path
    }

    /// Get the default configuration file path
    fn default_config_path() -> PathBuf {
        if let Ok(config_path) = env::var("FURIA_CONFIG") {
            return PathBuf::from(config_path);
        }

        let local = PathBuf::from("furia.toml");
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|d| d.join("furia").join("config.toml"))
            .unwrap_or(local)
    }

    /// Load configuration with full hierarchy
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load(&self) -> Result<Config> {
        let mut config = Config::default();

        if self.config_path.exists() {
            let file_config = self.load_from_file()?;
            config = merge_file_config(config, file_config);
        }

        config = self.merge_env_config(config)?;

        config.validate().map_err(|e| {
            FuriaError::configuration(format!("Configuration validation failed: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from file
    fn load_from_file(&self) -> Result<FileConfig> {
        let content = std::fs::read_to_string(&self.config_path).map_err(|e| {
            FuriaError::configuration(format!(
                "Failed to read config file '{}': {}",
                self.config_path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            FuriaError::configuration(format!(
                "Failed to parse config file '{}': {}",
                self.config_path.display(),
                e
            ))
        })
    }

    /// Merge environment variables into configuration
    fn merge_env_config(&self, mut config: Config) -> Result<Config> {
        let var = |key: &str| env::var(format!("{}_{}", self.env_prefix, key)).ok();

        if let Some(val) = var("API_BASE_URL") {
            config.api.base_url = val;
        }
        if let Some(val) = var("API_TIMEOUT_SECS") {
            config.api.timeout = Duration::from_secs(parse_u64(&val, "API_TIMEOUT_SECS")?);
        }

        if let Some(val) = var("RECOVERY_MAX_ATTEMPTS") {
            config.recovery.max_attempts = parse_u32(&val, "RECOVERY_MAX_ATTEMPTS")?;
        }
        if let Some(val) = var("RECOVERY_INITIAL_DELAY_SECS") {
            config.recovery.initial_delay =
                Duration::from_secs(parse_u64(&val, "RECOVERY_INITIAL_DELAY_SECS")?);
        }
        if let Some(val) = var("RECOVERY_POLL_INTERVAL_SECS") {
            config.recovery.poll_interval =
                Duration::from_secs(parse_u64(&val, "RECOVERY_POLL_INTERVAL_SECS")?);
        }
        if let Some(val) = var("RECOVERY_RESEND_COOLDOWN_SECS") {
            config.recovery.resend_cooldown =
                Duration::from_secs(parse_u64(&val, "RECOVERY_RESEND_COOLDOWN_SECS")?);
        }

        if let Some(val) = var("STORAGE_PATH") {
            config.storage.path = PathBuf::from(val);
        }

        Ok(config)
    }
}

/// Merge file configuration into base configuration
fn merge_file_config(mut base: Config, file: FileConfig) -> Config {
    if let Some(api) = file.api {
        if let Some(url) = api.base_url {
            base.api.base_url = url;
        }
        if let Some(secs) = api.timeout_secs {
            base.api.timeout = Duration::from_secs(secs);
        }
    }

    if let Some(recovery) = file.recovery {
        if let Some(max) = recovery.max_attempts {
            base.recovery.max_attempts = max;
        }
        if let Some(secs) = recovery.initial_delay_secs {
            base.recovery.initial_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = recovery.poll_interval_secs {
            base.recovery.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = recovery.resend_cooldown_secs {
            base.recovery.resend_cooldown = Duration::from_secs(secs);
        }
    }

    if let Some(storage) = file.storage {
        if let Some(path) = storage.path {
            base.storage.path = path;
        }
    }

    base
}

/// Render a configuration in the file layout `load` accepts
pub(super) fn render(config: &Config) -> Result<String> {
    let file = FileConfig {
        api: Some(FileApiConfig {
            base_url: Some(config.api.base_url.clone()),
            timeout_secs: Some(config.api.timeout.as_secs()),
        }),
        recovery: Some(FileRecoveryConfig {
            max_attempts: Some(config.recovery.max_attempts),
            initial_delay_secs: Some(config.recovery.initial_delay.as_secs()),
            poll_interval_secs: Some(config.recovery.poll_interval.as_secs()),
            resend_cooldown_secs: Some(config.recovery.resend_cooldown.as_secs()),
        }),
        storage: Some(FileStorageConfig {
            path: Some(config.storage.path.clone()),
        }),
    };

    toml::to_string_pretty(&file)
        .map_err(|e| FuriaError::configuration(format!("Failed to render config: {}", e)))
}

/// Parse a u32 from string
fn parse_u32(s: &str, name: &str) -> Result<u32> {
    s.trim().parse::<u32>().map_err(|e| {
        FuriaError::configuration(format!(
            "Invalid {} '{}': must be a valid number. Error: {}",
            name, s, e
        ))
    })
}

/// Parse a u64 from string
fn parse_u64(s: &str, name: &str) -> Result<u64> {
    s.trim().parse::<u64>().map_err(|e| {
        FuriaError::configuration(format!(
            "Invalid {} '{}': must be a valid number. Error: {}",
            name, s, e
        ))
    })
}

/// On-disk layout; every field optional so files may be partial
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api: Option<FileApiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recovery: Option<FileRecoveryConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage: Option<FileStorageConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct FileApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct FileRecoveryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial_delay_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    poll_interval_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resend_cooldown_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct FileStorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_config_loader_new() {
        let loader = ConfigLoader::new();
        assert_eq!(loader.env_prefix, "FURIA");
        assert!(loader.config_path.file_name().is_some());
    }

    #[test]
    fn test_config_loader_with_path() {
        let loader = ConfigLoader::with_path("/custom/furia.toml");
        assert_eq!(loader.config_path(), PathBuf::from("/custom/furia.toml"));
    }

    #[test]
    fn test_config_loader_with_prefix() {
        let loader = ConfigLoader::with_prefix("MYAPP");
        assert_eq!(loader.env_prefix, "MYAPP");
    }

    #[test]
    fn test_load_from_file_success() {
        let temp_file = write_config(
            r#"
            [api]
            base_url = "https://api.furia.gg/"

            [recovery]
            max_attempts = 10
            poll_interval_secs = 3
        "#,
        );

        let config = ConfigLoader::with_path(temp_file.path())
            .env_prefix("FURIA_TEST_FILE")
            .load()
            .unwrap();

        assert_eq!(config.api.base_url, "https://api.furia.gg/");
        assert_eq!(config.recovery.max_attempts, 10);
        assert_eq!(config.recovery.poll_interval, Duration::from_secs(3));
        // Untouched values keep their defaults
        assert_eq!(config.recovery.resend_cooldown, Duration::from_secs(60));
        assert_eq!(config.api.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let config = ConfigLoader::with_path("/nonexistent/path/furia.toml")
            .env_prefix("FURIA_TEST_MISSING")
            .load()
            .unwrap();
        assert_eq!(config.recovery.max_attempts, 18);
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let temp_file = write_config("[recovery\nmax_attempts = ");
        let err = ConfigLoader::with_path(temp_file.path())
            .env_prefix("FURIA_TEST_MALFORMED")
            .load()
            .unwrap_err();
        assert!(matches!(err, FuriaError::Configuration(_)));
    }

    #[test]
    fn test_env_priority_over_file() {
        let temp_file = write_config(
            r#"
            [recovery]
            max_attempts = 10
            resend_cooldown_secs = 30
        "#,
        );

        env::set_var("FURIA_TEST_PRIORITY_RECOVERY_MAX_ATTEMPTS", "4");
        env::set_var("FURIA_TEST_PRIORITY_STORAGE_PATH", "/tmp/furia-session.json");

        let config = ConfigLoader::with_path(temp_file.path())
            .env_prefix("FURIA_TEST_PRIORITY")
            .load()
            .unwrap();

        assert_eq!(config.recovery.max_attempts, 4);
        assert_eq!(config.recovery.resend_cooldown, Duration::from_secs(30));
        assert_eq!(config.storage.path, PathBuf::from("/tmp/furia-session.json"));

        env::remove_var("FURIA_TEST_PRIORITY_RECOVERY_MAX_ATTEMPTS");
        env::remove_var("FURIA_TEST_PRIORITY_STORAGE_PATH");
    }

    #[test]
    fn test_invalid_env_number() {
        env::set_var("FURIA_TEST_BADNUM_API_TIMEOUT_SECS", "soon");

        let err = ConfigLoader::with_path("/nonexistent/furia.toml")
            .env_prefix("FURIA_TEST_BADNUM")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("API_TIMEOUT_SECS"));

        env::remove_var("FURIA_TEST_BADNUM_API_TIMEOUT_SECS");
    }

    #[test]
    fn test_load_with_validation_error() {
        let temp_file = write_config(
            r#"
            [recovery]
            max_attempts = 0
        "#,
        );

        let result = ConfigLoader::with_path(temp_file.path())
            .env_prefix("FURIA_TEST_INVALID")
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_numeric_types() {
        assert_eq!(parse_u32(" 18 ", "TEST").unwrap(), 18);
        assert_eq!(parse_u64("60", "TEST").unwrap(), 60);
        assert!(parse_u32("-1", "TEST").is_err());
        assert!(parse_u64("five", "TEST").is_err());
    }
}
