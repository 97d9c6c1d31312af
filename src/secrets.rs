//! Secret store access for the chat API credential.
//!
//! A secret is looked up by name and its value is a JSON-encoded string map;
//! the credential sits under a fixed key inside that map. Lookups happen on
//! every chat request — credentials are never cached here.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretError {
    #[error("Secret store unavailable: {0}")]
    Unavailable(String),

    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Secret {0} is not a JSON string map")]
    Malformed(String),

    #[error("Secret {name} has no entry for key {key}")]
    KeyMissing { name: String, key: String },
}

/// Named-secret lookup. Implementations return the raw secret string; the
/// caller decodes it.
pub trait SecretStore: Send + Sync {
    fn get_secret_string(&self, name: &str) -> Result<String, SecretError>;
}

/// Directory-backed store: the secret named `a/b/c` lives in the file
/// `<dir>/a/b/c`.
pub struct FileSecretStore {
    dir: PathBuf,
}

impl FileSecretStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SecretStore for FileSecretStore {
    fn get_secret_string(&self, name: &str) -> Result<String, SecretError> {
        let path = self.dir.join(name);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(SecretError::NotFound(name.to_string()))
            }
            Err(e) => Err(SecretError::Unavailable(e.to_string())),
        }
    }
}

/// In-memory store for tests and local development.
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, String>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: &str, value: &str) -> Self {
        self.secrets.insert(name.to_string(), value.to_string());
        self
    }
}

impl SecretStore for MemorySecretStore {
    fn get_secret_string(&self, name: &str) -> Result<String, SecretError> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }
}

/// Fetch the credential: look up the secret by name, decode the JSON string
/// map, extract the fixed key. Store errors propagate unrecovered.
pub fn fetch_credential(
    store: &dyn SecretStore,
    name: &str,
    key: &str,
) -> Result<String, SecretError> {
    let raw = store.get_secret_string(name)?;
    let map: HashMap<String, String> =
        serde_json::from_str(&raw).map_err(|_| SecretError::Malformed(name.to_string()))?;
    map.get(key).cloned().ok_or_else(|| SecretError::KeyMissing {
        name: name.to_string(),
        key: key.to_string(),
    })
}

/// Mask a credential for logging: the first 7 characters survive, the rest
/// become `*`.
pub fn mask_value(value: &str) -> String {
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < 7 { c } else { '*' })
        .collect()
}
