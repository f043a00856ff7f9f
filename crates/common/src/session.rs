//! Session credential storage and the in-process credential guard.
//!
//! The credential is an opaque bearer token. It is observable only as
//! present or absent: created at login, attached to outgoing requests,
//! destroyed on logout or when the server rejects it.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Error type for session store operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    /// Reading or writing the token file failed.
    #[error("Session store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// No per-user data directory could be resolved.
    #[error("No usable data directory for session storage")]
    NoDataDir,
}

/// Durable storage for the session credential.
///
/// Implementations are opaque key stores: they hold at most one token and
/// survive (or deliberately do not survive) process restarts.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the stored credential, if any.
    async fn load(&self) -> Result<Option<String>, SessionStoreError>;

    /// Persist the credential, replacing any previous one.
    async fn store(&self, token: &str) -> Result<(), SessionStoreError>;

    /// Remove the stored credential.
    async fn clear(&self) -> Result<(), SessionStoreError>;
}

/// File-backed session store.
///
/// Keeps the token in a single file, mode 0600 on unix.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store writing to the given token file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at the default per-user data directory.
    pub fn default_location() -> Result<Self, SessionStoreError> {
        let dirs = directories::ProjectDirs::from("dev", "reunite", "reunite")
            .ok_or(SessionStoreError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join("session.token")))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<String>, SessionStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, token: &str) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, token).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, perms).await?;
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Non-durable store keeping the credential in process memory only.
#[derive(Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<String>, SessionStoreError> {
        Ok(self.token.read().await.clone())
    }

    async fn store(&self, token: &str) -> Result<(), SessionStoreError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Holds the session credential for the lifetime of the process.
pub struct SessionGuard {
    token: RwLock<Option<String>>,
    store: Box<dyn SessionStore>,
}

impl SessionGuard {
    /// Create a guard over the given store, hydrating from it.
    pub async fn new(store: Box<dyn SessionStore>) -> Result<Self, SessionStoreError> {
        let token = store.load().await?;
        if token.is_some() {
            debug!("Restored session credential from store");
        }
        Ok(Self {
            token: RwLock::new(token),
            store,
        })
    }

    /// Whether a credential is currently present.
    pub async fn has_credential(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// The current bearer token, if any.
    pub async fn bearer(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Attach the bearer credential to an outgoing request.
    ///
    /// Passes the request through unchanged when no credential is present.
    pub async fn attach(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().await.as_ref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Install a new credential and persist it.
    pub async fn set_session(&self, token: String) -> Result<(), SessionStoreError> {
        self.store.store(&token).await?;
        *self.token.write().await = Some(token);
        debug!("Session credential installed");
        Ok(())
    }

    /// Destroy the credential in memory and in the store.
    ///
    /// Called on logout and whenever an authenticated call observes an
    /// auth failure. Clears state only; the caller decides what to show.
    pub async fn invalidate(&self) {
        *self.token.write().await = None;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear stored session");
        }
        info!("Session credential invalidated");
    }
}
