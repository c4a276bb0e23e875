use crate::error::ValidationError;

pub const API_KEY_PREFIX: &str = "sk-";
/// A key must be strictly longer than this many characters.
pub const API_KEY_MIN_LEN: usize = 20;

/// Check a user-entered key and return it trimmed.
///
/// Only a shape check: prefix `sk-` and more than 20 characters. Whether the
/// key is accepted upstream is only known on the first request.
pub fn validate_api_key(raw: &str) -> Result<String, ValidationError> {
    let key = raw.trim();

    if !key.starts_with(API_KEY_PREFIX) {
        return Err(ValidationError::MissingPrefix {
            prefix: API_KEY_PREFIX,
        });
    }

    let len = key.chars().count();
    if len <= API_KEY_MIN_LEN {
        return Err(ValidationError::TooShort {
            len,
            min: API_KEY_MIN_LEN,
        });
    }

    Ok(key.to_string())
}
