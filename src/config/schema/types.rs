use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
/// JPEG quality on the encoder's 1-100 scale (0.8 on a 0-1 scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Artificial latency for demo mode, in milliseconds.
    #[serde(default = "default_demo_delay_ms")]
    pub demo_delay_ms: u64,

    #[serde(default)]
    pub secrets: SecretsConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_demo_delay_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".plantsnap"),
            config_path: PathBuf::from(".plantsnap").join("config.toml"),
            api_url: default_api_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            request_timeout_secs: default_request_timeout_secs(),
            jpeg_quality: default_jpeg_quality(),
            demo_delay_ms: default_demo_delay_ms(),
            secrets: SecretsConfig::default(),
        }
    }
}

impl Config {
    pub fn demo_delay(&self) -> Duration {
        Duration::from_millis(self.demo_delay_ms)
    }

    /// Where the secret store keeps its entries. A configured path may use `~`.
    pub fn secrets_path(&self) -> PathBuf {
        match self.secrets.store_path.as_deref() {
            Some(path) if !path.trim().is_empty() => {
                PathBuf::from(shellexpand::tilde(path.trim()).into_owned())
            }
            _ => self.data_dir.join("secrets.json"),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Validation(msg.to_string()));
        if self.api_url.trim().is_empty() {
            return invalid("api_url must not be empty");
        }
        if self.model.trim().is_empty() {
            return invalid("model must not be empty");
        }
        if self.max_tokens == 0 {
            return invalid("max_tokens must be greater than 0");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return invalid("temperature must be within 0.0..=2.0");
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return invalid("jpeg_quality must be within 1..=100");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default = "default_true")]
    pub encrypt: bool,
    #[serde(default)]
    pub store_path: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            encrypt: true,
            store_path: None,
        }
    }
}
