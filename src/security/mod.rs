pub mod api_key;
pub mod keystore;
pub mod secrets;

pub use api_key::validate_api_key;
pub use keystore::{FileSecretStore, MemorySecretStore, SecretStore};
pub use secrets::SecretCipher;
