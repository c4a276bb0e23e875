//! At-rest encryption for stored secrets.
//!
//! Values are sealed with ChaCha20-Poly1305 under a 256-bit key kept in a
//! hex-encoded key file next to the secret store. Sealed values take the form
//! `ENC:<hex(nonce || ciphertext)>`.

use anyhow::{Context, Result};
use chacha20poly1305::{
    ChaCha20Poly1305, KeyInit, Nonce,
    aead::{Aead, OsRng, rand_core::RngCore},
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

const KEY_FILE: &str = ".plantsnap_key";
const ENC_PREFIX: &str = "ENC:";
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

pub struct SecretCipher {
    key_path: PathBuf,
    enabled: bool,
}

impl SecretCipher {
    /// `dir` holds the key file; with `enabled = false` values pass through
    /// unchanged.
    pub fn new(dir: &Path, enabled: bool) -> Self {
        Self {
            key_path: dir.join(KEY_FILE),
            enabled,
        }
    }

    #[must_use]
    pub fn is_sealed(value: &str) -> bool {
        value.starts_with(ENC_PREFIX)
    }

    pub fn seal(&self, plaintext: &str) -> Result<String> {
        if !self.enabled || plaintext.is_empty() {
            return Ok(plaintext.to_string());
        }

        let cipher = self.cipher()?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| anyhow::anyhow!("encryption failed: {e}"))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);
        Ok(format!("{ENC_PREFIX}{}", hex::encode(combined)))
    }

    /// Unseal a stored value. Plain values written while encryption was
    /// disabled are returned as-is.
    pub fn open(&self, value: &str) -> Result<String> {
        let Some(hex_str) = value.strip_prefix(ENC_PREFIX) else {
            return Ok(value.to_string());
        };

        let combined = hex::decode(hex_str).context("invalid hex in sealed value")?;
        if combined.len() < NONCE_LEN {
            anyhow::bail!("sealed value too short");
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let mut plaintext = self
            .cipher()?
            .decrypt(nonce, ciphertext)
            .map_err(|e| anyhow::anyhow!("decryption failed: {e}"))?;

        let text = String::from_utf8(plaintext.clone()).context("sealed value is not UTF-8");
        plaintext.zeroize();
        text
    }

    fn cipher(&self) -> Result<ChaCha20Poly1305> {
        let mut key_bytes = self.load_or_create_key()?;
        let cipher = ChaCha20Poly1305::new_from_slice(&key_bytes).context("invalid key length");
        key_bytes.zeroize();
        cipher
    }

    fn read_key_file(path: &Path) -> Result<Vec<u8>> {
        let hex_key = fs::read_to_string(path).context("failed to read key file")?;
        let key = hex::decode(hex_key.trim()).context("invalid hex in key file")?;
        if key.len() != KEY_LEN {
            anyhow::bail!("key file has invalid length (expected {KEY_LEN} bytes)");
        }
        Ok(key)
    }

    fn write_new_key_file(path: &Path, key: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create key directory")?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;

            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .mode(0o600)
                .open(path)
                .context("failed to create key file")?;
            file.write_all(hex::encode(key).as_bytes())
                .context("failed to write key file")?;
            file.sync_all().context("failed to sync key file")?;
        }

        #[cfg(not(unix))]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .context("failed to create key file")?;
            file.write_all(hex::encode(key).as_bytes())
                .context("failed to write key file")?;
        }

        Ok(())
    }

    fn load_or_create_key(&self) -> Result<Vec<u8>> {
        if self.key_path.exists() {
            return Self::read_key_file(&self.key_path);
        }

        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        match Self::write_new_key_file(&self.key_path, &key) {
            Ok(()) => Ok(key),
            Err(error) => {
                key.zeroize();
                let lost_race = error
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::AlreadyExists);
                if lost_race {
                    Self::read_key_file(&self.key_path)
                } else {
                    Err(error)
                }
            }
        }
    }
}
