use plantsnap::core::session::{API_KEY_ACCOUNT, API_KEY_SERVICE};
use plantsnap::{
    FileSecretStore, PlantSnapError, SecretStore, SecretStoreError, SessionState,
    ValidationError,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

fn file_store(dir: &TempDir) -> Arc<FileSecretStore> {
    Arc::new(FileSecretStore::new(&dir.path().join("secrets.json"), true))
}

#[test]
fn saved_key_survives_fresh_initialize() {
    let dir = TempDir::new().unwrap();
    let key = format!("sk-{}", "x".repeat(25));

    let mut session = SessionState::initialize(file_store(&dir));
    session.save(&key).unwrap();
    assert!(session.is_authenticated());

    let reloaded = SessionState::initialize(file_store(&dir));
    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.api_key(), Some(key.as_str()));
}

#[test]
fn cleared_key_is_gone_after_fresh_initialize() {
    let dir = TempDir::new().unwrap();
    let key = format!("sk-{}", "x".repeat(25));

    let mut session = SessionState::initialize(file_store(&dir));
    session.save(&key).unwrap();
    session.clear().unwrap();
    assert!(!session.is_authenticated());

    let reloaded = SessionState::initialize(file_store(&dir));
    assert!(!reloaded.is_authenticated());
    assert!(reloaded.api_key().is_none());
}

#[test]
fn unreadable_store_starts_signed_out() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("secrets.json"), "garbage").unwrap();

    let session = SessionState::initialize(file_store(&dir));
    assert!(!session.is_authenticated());
}

/// Counts writes so tests can prove rejected keys never reach the store.
#[derive(Default)]
struct CountingStore {
    sets: AtomicUsize,
}

impl SecretStore for CountingStore {
    fn get(&self, _service: &str, _account: &str) -> Result<Option<String>, SecretStoreError> {
        Ok(None)
    }

    fn set(&self, service: &str, account: &str, _value: &str) -> Result<(), SecretStoreError> {
        assert_eq!((service, account), (API_KEY_SERVICE, API_KEY_ACCOUNT));
        self.sets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete(&self, _service: &str, _account: &str) -> Result<(), SecretStoreError> {
        Ok(())
    }
}

#[test]
fn invalid_keys_never_reach_save() {
    let store = Arc::new(CountingStore::default());
    let mut session = SessionState::initialize(store.clone());

    let seventeen = format!("sk-{}", "x".repeat(17));
    for bad in ["abc", "sk-", "sk-short", seventeen.as_str()] {
        let err = session.login(bad).unwrap_err();
        assert!(matches!(err, PlantSnapError::Validation(_)), "{bad}");
    }
    assert_eq!(store.sets.load(Ordering::SeqCst), 0);
    assert!(!session.is_authenticated());

    session.login(&format!("sk-{}", "x".repeat(25))).unwrap();
    assert_eq!(store.sets.load(Ordering::SeqCst), 1);
}

#[test]
fn short_key_reports_length() {
    let mut session = SessionState::initialize(Arc::new(CountingStore::default()));
    let err = session.login("sk-abc").unwrap_err();
    assert!(matches!(
        err,
        PlantSnapError::Validation(ValidationError::TooShort { len: 6, .. })
    ));
}

struct FailingStore;

impl SecretStore for FailingStore {
    fn get(&self, _service: &str, _account: &str) -> Result<Option<String>, SecretStoreError> {
        Err(SecretStoreError::Read("denied".into()))
    }

    fn set(&self, _service: &str, _account: &str, _value: &str) -> Result<(), SecretStoreError> {
        Err(SecretStoreError::Write("denied".into()))
    }

    fn delete(&self, _service: &str, _account: &str) -> Result<(), SecretStoreError> {
        Err(SecretStoreError::Write("denied".into()))
    }
}

#[test]
fn failing_store_behaves_as_absent_secret() {
    let mut session = SessionState::initialize(Arc::new(FailingStore));
    assert!(!session.is_authenticated());

    assert!(session.save(&format!("sk-{}", "x".repeat(25))).is_err());
    assert!(!session.is_authenticated());

    assert!(session.clear().is_err());
    assert!(!session.is_authenticated());
}
