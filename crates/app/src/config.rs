//! Snowdex configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (capture only)
//! - `GEMINI_API_KEY` - Google Gemini API key (falls back to `API_KEY`)
//!
//! ## Optional
//! - `GEMINI_BASE_URL` - API root (default: <https://generativelanguage.googleapis.com/v1beta>)
//! - `GEMINI_ANALYSIS_MODEL` - Model for structured analysis (default: gemini-3-flash-preview)
//! - `GEMINI_STICKER_MODEL` - Model for sticker generation (default: gemini-2.5-flash-image)
//! - `SNOWDEX_DATA_DIR` - Directory holding the local store (default: .snowdex)
//! - `SNOWDEX_LOG_FORMAT` - `text` or `json` (default: text)

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_STICKER_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_DATA_DIR: &str = ".snowdex";

/// Blocklist of common placeholder prefixes (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct SnowdexConfig {
    /// Local store configuration
    pub storage: StorageConfig,
    /// Gemini API configuration
    pub gemini: GeminiConfig,
    /// Log output format
    pub log_format: LogFormat,
}

/// Where the local store keeps its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding one JSON document per key
    pub data_dir: PathBuf,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Google AI Studio API key
    pub api_key: SecretString,
    /// API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub base_url: Url,
    /// Model used for structured snowman analysis
    pub analysis_model: String,
    /// Model used for sticker image generation
    pub sticker_model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("analysis_model", &self.analysis_model)
            .field("sticker_model", &self.sticker_model)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

impl SnowdexConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&env_lookup)
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`SnowdexConfig::from_env`].
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            storage: StorageConfig::from_lookup(lookup),
            gemini: GeminiConfig::from_lookup(lookup)?,
            log_format: LogFormat::from_lookup(lookup)?,
        })
    }

    /// Returns a reference to the Gemini configuration.
    #[must_use]
    pub const fn gemini(&self) -> &GeminiConfig {
        &self.gemini
    }

    /// Returns a reference to the storage configuration.
    #[must_use]
    pub const fn storage(&self) -> &StorageConfig {
        &self.storage
    }
}

impl StorageConfig {
    /// Load storage configuration from environment.
    ///
    /// Never fails: the data directory has a default. Commands that only
    /// touch profiles use this so they work without an API key.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(lookup: Lookup<'_>) -> Self {
        Self {
            data_dir: PathBuf::from(get_env_or_default(lookup, "SNOWDEX_DATA_DIR", DEFAULT_DATA_DIR)),
        }
    }
}

impl GeminiConfig {
    fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let base_url = get_env_or_default(lookup, "GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("GEMINI_BASE_URL".to_string(), e.to_string()))?;

        Ok(Self {
            api_key: get_api_key(lookup, "GEMINI_API_KEY")?,
            base_url,
            analysis_model: get_env_or_default(lookup, "GEMINI_ANALYSIS_MODEL", DEFAULT_ANALYSIS_MODEL),
            sticker_model: get_env_or_default(lookup, "GEMINI_STICKER_MODEL", DEFAULT_STICKER_MODEL),
        })
    }
}

impl LogFormat {
    /// Load the log format from environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for values other than `text`/`json`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&env_lookup)
    }

    /// Load the log format from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`LogFormat::from_env`].
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        get_optional_env(lookup, "SNOWDEX_LOG_FORMAT").map_or(Ok(Self::Text), |value| {
            value
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("SNOWDEX_LOG_FORMAT".to_string(), e))
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Source of configuration variables.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a required environment variable.
fn get_required_env(lookup: Lookup<'_>, key: &str) -> Result<String, ConfigError> {
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(lookup: Lookup<'_>, key: &str) -> Option<String> {
    lookup(key)
}

/// Get an environment variable with a default value.
fn get_env_or_default(lookup: Lookup<'_>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Get the API key with fallback to the generic `API_KEY` the web build used.
fn get_api_key(lookup: Lookup<'_>, primary_key: &str) -> Result<SecretString, ConfigError> {
    if lookup(primary_key).is_some() {
        return get_validated_secret(lookup, primary_key);
    }
    if lookup("API_KEY").is_some() {
        return get_validated_secret(lookup, "API_KEY");
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Prefix only: random keys contain short words like "xxx" by chance
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.starts_with(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (starts with '{pattern}')"),
            ));
        }
    }

    // Real API keys are random; low entropy means someone typed a word
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by Google AI Studio."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(lookup: Lookup<'_>, key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(lookup, key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
