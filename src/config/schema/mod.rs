mod env_overrides;
mod loader;
mod types;

pub use types::{
    Config, DEFAULT_API_URL, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    SecretsConfig,
};
