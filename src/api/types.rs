//! Shared context for the conversation API.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::chat::ChatApi;
use crate::secrets::SecretStore;

/// Locates the chat API credential inside the secret store.
#[derive(Debug, Clone)]
pub struct CredentialRef {
    pub secret_name: String,
    pub secret_key: String,
}

/// Shared state for all routes: the store connection plus the injected
/// secret-store and chat-API collaborators.
#[derive(Clone)]
pub struct ApiContext {
    pub db: Arc<Mutex<Connection>>,
    pub secrets: Arc<dyn SecretStore>,
    pub chat: Arc<dyn ChatApi>,
    pub credential: CredentialRef,
}

impl ApiContext {
    pub fn new(
        db: Connection,
        secrets: Arc<dyn SecretStore>,
        chat: Arc<dyn ChatApi>,
        credential: CredentialRef,
    ) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            secrets,
            chat,
            credential,
        }
    }

    /// Lock the store connection. The guard must be dropped before any await.
    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("store lock poisoned".into()))
    }
}
