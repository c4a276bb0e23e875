use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `plantsnap`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal plumbing continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum PlantSnapError {
    // ── API key entry ───────────────────────────────────────────────────
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    // ── Identification client ───────────────────────────────────────────
    #[error("identify: {0}")]
    Identify(#[from] IdentifyError),

    // ── Secret storage ──────────────────────────────────────────────────
    #[error("secret store: {0}")]
    SecretStore(#[from] SecretStoreError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Validation errors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("API key must start with \"{prefix}\"")]
    MissingPrefix { prefix: &'static str },

    #[error("API key is too short ({len} chars, need more than {min})")]
    TooShort { len: usize, min: usize },
}

// ─── Identification errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum IdentifyError {
    /// Network failure, unreadable body, or an HTTP status of 400 or above.
    #[error("transport failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("image could not be encoded as JPEG: {0}")]
    InvalidImage(String),
}

impl IdentifyError {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Decode(_) => "decode",
            Self::InvalidImage(_) => "image",
        }
    }
}

/// The two decode stages of a chat completion: the outer envelope, then the
/// JSON document embedded in `choices[0].message.content`.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response envelope is not valid JSON: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("response has no choices[0].message.content")]
    MissingContent,

    #[error("embedded content does not match the result schema: {0}")]
    Content(#[source] serde_json::Error),
}

// ─── Secret store errors ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("read failed: {0}")]
    Read(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("cipher: {0}")]
    Cipher(String),
}

// ─── Config errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PlantSnapError>;
