//! Key-value secret storage addressed by a `(service, account)` pair.

use super::secrets::SecretCipher;
use crate::error::SecretStoreError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage for named secrets.
///
/// `set` replaces any existing entry for the same pair; `delete` on a missing
/// entry is a no-op.
pub trait SecretStore: Send + Sync {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, SecretStoreError>;

    fn set(&self, service: &str, account: &str, value: &str) -> Result<(), SecretStoreError>;

    fn delete(&self, service: &str, account: &str) -> Result<(), SecretStoreError>;
}

// ── File-backed store ────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    entries: Vec<StoredEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    service: String,
    account: String,
    value: String,
}

impl StoreDocument {
    fn position(&self, service: &str, account: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.service == service && e.account == account)
    }

    fn remove(&mut self, service: &str, account: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.service == service && e.account == account));
        self.entries.len() != before
    }
}

/// JSON document on disk with every value sealed by [`SecretCipher`].
pub struct FileSecretStore {
    path: PathBuf,
    cipher: SecretCipher,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSecretStore {
    pub fn new(path: &Path, encrypt: bool) -> Self {
        let key_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self {
            path: path.to_path_buf(),
            cipher: SecretCipher::new(key_dir, encrypt),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> anyhow::Result<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read secret store: {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse secret store: {}", self.path.display()))
    }

    fn persist(&self, document: &StoreDocument) -> anyhow::Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create secret store directory: {}", parent.display())
        })?;

        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        write_owner_only(&tmp, json.as_bytes())?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace secret store: {}", self.path.display()))
    }
}

fn write_owner_only(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        file.sync_all()?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

fn read_err(error: &anyhow::Error) -> SecretStoreError {
    SecretStoreError::Read(format!("{error:#}"))
}

fn write_err(error: &anyhow::Error) -> SecretStoreError {
    SecretStoreError::Write(format!("{error:#}"))
}

impl SecretStore for FileSecretStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, SecretStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let document = self.load().map_err(|e| read_err(&e))?;
        let Some(index) = document.position(service, account) else {
            return Ok(None);
        };
        self.cipher
            .open(&document.entries[index].value)
            .map(Some)
            .map_err(|e| SecretStoreError::Cipher(format!("{e:#}")))
    }

    fn set(&self, service: &str, account: &str, value: &str) -> Result<(), SecretStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut document = self.load().map_err(|e| read_err(&e))?;
        let sealed = self
            .cipher
            .seal(value)
            .map_err(|e| SecretStoreError::Cipher(format!("{e:#}")))?;

        document.remove(service, account);
        document.entries.push(StoredEntry {
            service: service.to_string(),
            account: account.to_string(),
            value: sealed,
        });
        self.persist(&document).map_err(|e| write_err(&e))?;
        tracing::debug!(service, account, "secret stored");
        Ok(())
    }

    fn delete(&self, service: &str, account: &str) -> Result<(), SecretStoreError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut document = self.load().map_err(|e| read_err(&e))?;
        if document.remove(service, account) {
            self.persist(&document).map_err(|e| write_err(&e))?;
            tracing::debug!(service, account, "secret deleted");
        }
        Ok(())
    }
}

// ── In-memory store ──────────────────────────────────────────────

/// Process-local store; nothing touches disk.
#[derive(Default)]
pub struct MemorySecretStore {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>, SecretStoreError> {
        Ok(self
            .entries()
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    fn set(&self, service: &str, account: &str, value: &str) -> Result<(), SecretStoreError> {
        let key = (service.to_string(), account.to_string());
        let mut entries = self.entries();
        entries.remove(&key);
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn delete(&self, service: &str, account: &str) -> Result<(), SecretStoreError> {
        self.entries()
            .remove(&(service.to_string(), account.to_string()));
        Ok(())
    }
}
