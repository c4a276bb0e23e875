use crate::error::{PlantSnapError, SecretStoreError};
use crate::security::{SecretStore, validate_api_key};
use std::sync::Arc;
use tokio::sync::watch;

/// Secret store service under which the API key lives.
pub const API_KEY_SERVICE: &str = "openai_api_key";
/// Secret store account; one key per installation.
pub const API_KEY_ACCOUNT: &str = "user";

/// Process-wide authentication state.
///
/// Holds the API key loaded from the secret store and mirrors every change
/// back to it. `is_authenticated()` is always `api_key().is_some()`;
/// observers can follow it through [`SessionState::subscribe`].
pub struct SessionState {
    store: Arc<dyn SecretStore>,
    secret: Option<String>,
    authenticated_tx: watch::Sender<bool>,
}

impl SessionState {
    /// Read the stored key once. A store failure counts as "no key".
    pub fn initialize(store: Arc<dyn SecretStore>) -> Self {
        let secret = match store.get(API_KEY_SERVICE, API_KEY_ACCOUNT) {
            Ok(secret) => secret,
            Err(error) => {
                tracing::warn!(%error, "secret store unavailable; starting signed out");
                None
            }
        };
        let (authenticated_tx, _) = watch::channel(secret.is_some());
        tracing::info!(authenticated = secret.is_some(), "session initialized");

        Self {
            store,
            secret,
            authenticated_tx,
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.secret.is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated_tx.subscribe()
    }

    /// Persist `key` and sign in. No validation happens here; on a store
    /// failure the session is left unchanged.
    pub fn save(&mut self, key: &str) -> Result<(), SecretStoreError> {
        self.store.set(API_KEY_SERVICE, API_KEY_ACCOUNT, key)?;
        self.secret = Some(key.to_string());
        self.publish();
        tracing::info!("API key saved");
        Ok(())
    }

    /// Sign out. The in-memory key is dropped even if the store delete fails;
    /// that failure is still returned.
    pub fn clear(&mut self) -> Result<(), SecretStoreError> {
        self.secret = None;
        self.publish();
        let deleted = self.store.delete(API_KEY_SERVICE, API_KEY_ACCOUNT);
        match &deleted {
            Ok(()) => tracing::info!("API key cleared"),
            Err(error) => tracing::warn!(%error, "API key cleared locally but not from store"),
        }
        deleted
    }

    /// Validate user input, then [`save`](Self::save) the trimmed key.
    /// Input that fails validation never reaches the store.
    pub fn login(&mut self, raw: &str) -> Result<(), PlantSnapError> {
        let key = validate_api_key(raw)?;
        self.save(&key)?;
        Ok(())
    }

    fn publish(&self) {
        self.authenticated_tx.send_replace(self.secret.is_some());
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
