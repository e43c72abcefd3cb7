//! Configuration structures for dispatch tuning and the model pool.
//!
//! This module provides TOML-based configuration with a precedence system:
//! - Bundled defaults (include_str! from paisa.toml)
//! - User overrides (./paisa.toml or ~/.config/paisa/paisa.toml)
//! - Automatic merging with user values taking precedence
//!
//! API credentials are deliberately excluded from TOML: they are read from
//! the environment only (`OPENROUTER_API_KEY` plus numbered fallbacks), so
//! a committed config file can never leak a secret.

use config::{Config, File, FileFormat};
use paisa_core::Credential;
use paisa_error::{ConfigError, PaisaError, PaisaResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable holding the primary API credential.
///
/// Fallback credentials use numbered suffixes: `OPENROUTER_API_KEY_2`,
/// `OPENROUTER_API_KEY_3`, and so on. The scan stops at the first gap.
pub const CREDENTIAL_ENV: &str = "OPENROUTER_API_KEY";

/// The model pool, ordered by preference.
///
/// Index 0 is the most preferred model; the dispatcher degrades down the
/// list only when earlier entries are rate limited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelsConfig {
    /// Model identifiers, most preferred first
    #[serde(default)]
    pub preference: Vec<String>,
}

/// Dispatch timing and budget tuning.
///
/// All fields have bundled defaults; a user override file only needs the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Minimum spacing between request starts, in milliseconds
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
    /// Block duration when a 429 carries no Retry-After header, in seconds
    #[serde(default = "default_retry_after_secs")]
    pub default_retry_after_secs: u64,
    /// Block duration for credentials rejected with 401, in seconds
    #[serde(default = "default_invalid_credential_block_secs")]
    pub invalid_credential_block_secs: u64,
    /// Token budget for full insight generation
    #[serde(default = "default_insight_max_tokens")]
    pub insight_max_tokens: u32,
    /// Token budget for short Q&A answers
    #[serde(default = "default_answer_max_tokens")]
    pub answer_max_tokens: u32,
    /// Sampling temperature passed to the upstream
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-attempt timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_min_request_interval_ms() -> u64 {
    1500
}

fn default_retry_after_secs() -> u64 {
    60
}

fn default_invalid_credential_block_secs() -> u64 {
    3600
}

fn default_insight_max_tokens() -> u32 {
    1024
}

fn default_answer_max_tokens() -> u32 {
    256
}

fn default_temperature() -> f32 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            min_request_interval_ms: default_min_request_interval_ms(),
            default_retry_after_secs: default_retry_after_secs(),
            invalid_credential_block_secs: default_invalid_credential_block_secs(),
            insight_max_tokens: default_insight_max_tokens(),
            answer_max_tokens: default_answer_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DispatchConfig {
    /// Minimum spacing between request starts.
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Default block duration for 429s without a Retry-After header.
    pub fn default_retry_after(&self) -> Duration {
        Duration::from_secs(self.default_retry_after_secs)
    }

    /// Block duration for credentials rejected with 401.
    pub fn invalid_credential_block(&self) -> Duration {
        Duration::from_secs(self.invalid_credential_block_secs)
    }

    /// Per-attempt timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Upstream endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Chat-completions URL
    pub url: String,
    /// Application title sent as the `X-Title` header
    #[serde(default)]
    pub app_title: String,
}

/// Top-level Paisa configuration.
///
/// # Example
///
/// ```no_run
/// use paisa_rate_limit::PaisaConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Load configuration (bundled defaults + user overrides)
/// let config = PaisaConfig::load()?;
/// assert!(!config.models.preference.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaisaConfig {
    /// Model pool
    pub models: ModelsConfig,
    /// Dispatch tuning
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Endpoint settings
    pub endpoint: EndpointConfig,
}

impl PaisaConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> PaisaResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                PaisaError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PaisaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override
    /// earlier):
    /// 1. Bundled defaults (paisa.toml shipped with the library)
    /// 2. User config in home directory (~/.config/paisa/paisa.toml)
    /// 3. User config in current directory (./paisa.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> PaisaResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../paisa.toml");

        let mut builder = Config::builder()
            // Start with bundled defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/paisa/paisa.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional, highest precedence)
        builder = builder.add_source(File::with_name("paisa").required(false));

        builder
            .build()
            .map_err(|e| {
                PaisaError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PaisaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}

/// Read credentials from the environment.
///
/// Returns the primary `OPENROUTER_API_KEY` followed by numbered fallbacks
/// (`OPENROUTER_API_KEY_2`, `OPENROUTER_API_KEY_3`, ...) in order. The scan
/// stops at the first missing number. Empty values are skipped.
pub fn credentials_from_env() -> Vec<Credential> {
    credentials_from_lookup(|name| std::env::var(name).ok())
}

/// Whether at least one API credential is configured.
pub fn is_configured() -> bool {
    !credentials_from_env().is_empty()
}

/// Credential scan over an arbitrary variable lookup.
///
/// Separated from [`credentials_from_env`] so tests can drive the scan
/// without mutating process environment.
pub(crate) fn credentials_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<Credential> {
    let mut credentials = Vec::new();

    if let Some(primary) = lookup(CREDENTIAL_ENV)
        && !primary.is_empty()
    {
        credentials.push(Credential::new(primary));
    }

    for n in 2.. {
        match lookup(&format!("{}_{}", CREDENTIAL_ENV, n)) {
            Some(value) => {
                if !value.is_empty() {
                    credentials.push(Credential::new(value));
                }
            }
            None => break,
        }
    }

    debug!("found {} API credential(s)", credentials.len());
    credentials
}
