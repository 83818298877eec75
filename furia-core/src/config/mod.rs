//! # FURIA Configuration
//!
//! Client configuration with three layers, later layers overriding earlier ones:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Environment Variables           │
//! │    FURIA_API_BASE_URL=http://...        │
//! ├─────────────────────────────────────────┤
//! │         Config File (furia.toml)        │
//! │    [api]                                │
//! │    base_url = "http://..."              │
//! ├─────────────────────────────────────────┤
//! │         Default Values                  │
//! └─────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod loader;

pub use loader::ConfigLoader;

use crate::error::{FuriaError, Result};

/// Backend the mobile app was built against
pub const DEFAULT_BASE_URL: &str = "http://192.168.1.7:8080/api/";

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Confirmation checks before giving up (18 x 5s = 90s of polling)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 18;

/// Delay before the first confirmation check
pub const DEFAULT_INITIAL_DELAY_SECS: u64 = 5;

/// Pause between two confirmation checks
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Cooldown before a reset e-mail may be re-sent
pub const DEFAULT_RESEND_COOLDOWN_SECS: u64 = 60;

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Backend connection
    pub api: ApiConfig,

    /// Password recovery polling policy
    pub recovery: RecoveryConfig,

    /// Local persistence
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration with full hierarchy (defaults -> file -> env)
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific path
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        ConfigLoader::with_path(path).load()
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.recovery.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Render in the same TOML layout the loader reads
    pub fn to_toml(&self) -> Result<String> {
        loader::render(self)
    }
}

/// Backend connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl ValidateConfig for ApiConfig {
    fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(validation_error("api.base_url cannot be empty"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(validation_error(format!(
                "api.base_url must start with http:// or https:// (got '{}')",
                url
            )));
        }
        validate_positive_duration(self.timeout, "api.timeout")
    }
}

/// Password recovery polling policy
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Confirmation checks before the workflow times out
    pub max_attempts: u32,

    /// Delay between a successful send and the first check
    pub initial_delay: Duration,

    /// Delay between the end of one check and the start of the next
    pub poll_interval: Duration,

    /// Time before the reset e-mail may be re-sent
    pub resend_cooldown: Duration,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            poll_interval: default_poll_interval(),
            resend_cooldown: default_resend_cooldown(),
        }
    }
}

impl ValidateConfig for RecoveryConfig {
    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(validation_error("recovery.max_attempts must be at least 1"));
        }
        validate_positive_duration(self.poll_interval, "recovery.poll_interval")
    }
}

/// Local persistence settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// JSON file holding the session and pending recovery state
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl ValidateConfig for StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(validation_error("storage.path cannot be empty"));
        }
        Ok(())
    }
}

/// Trait for configuration validation
pub trait ValidateConfig {
    /// Validate configuration values
    fn validate(&self) -> Result<()>;
}

fn validation_error(msg: impl Into<String>) -> FuriaError {
    FuriaError::configuration(format!("Validation error: {}", msg.into()))
}

fn validate_positive_duration(duration: Duration, name: &str) -> Result<()> {
    if duration.is_zero() {
        return Err(validation_error(format!("{} cannot be zero", name)));
    }
    Ok(())
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(DEFAULT_INITIAL_DELAY_SECS)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
}

fn default_resend_cooldown() -> Duration {
    Duration::from_secs(DEFAULT_RESEND_COOLDOWN_SECS)
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("furia").join("session.json"))
        .unwrap_or_else(|| PathBuf::from(".furia").join("session.json"))
}
