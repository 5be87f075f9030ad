//! Explicit session context handed to the API client.
//!
//! The dashboards keep their bearer token in durable browser storage under one key
//! per surface. Here the storage is a [`TokenStore`] and the surface is an
//! [`AuthScope`]; the client reads the token at the start of every request.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Which dashboard surface a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScope {
    Admin,
    Couple,
}

impl AuthScope {
    /// Storage key the token lives under.
    pub const fn storage_key(self) -> &'static str {
        match self {
            AuthScope::Admin => "admin_access_token",
            AuthScope::Couple => "access_token",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AuthScope::Admin => "admin",
            AuthScope::Couple => "couple",
        }
    }
}

/// Durable key/value storage for access tokens.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, token: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("token store io failure at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token store at {} is not valid JSON: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("token store lock poisoned")]
    Poisoned,
}

/// Process-local store, used by tests and the in-process demo.
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<BTreeMap<String, String>>>,
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let guard = self.tokens.read().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, token: &str) -> Result<(), SessionError> {
        let mut guard = self.tokens.write().map_err(|_| SessionError::Poisoned)?;
        guard.insert(key.to_string(), token.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut guard = self.tokens.write().map_err(|_| SessionError::Poisoned)?;
        guard.remove(key);
        Ok(())
    }
}

/// JSON file keyed by storage key, used by the CLI between invocations.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&raw).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, tokens: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_vec_pretty(tokens).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, body).map_err(io_err)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, token: &str) -> Result<(), SessionError> {
        let mut tokens = self.read_all()?;
        tokens.insert(key.to_string(), token.to_string());
        self.write_all(&tokens)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut tokens = self.read_all()?;
        if tokens.remove(key).is_some() {
            self.write_all(&tokens)?;
        }
        Ok(())
    }
}

/// Wraps the token store the API client reads before every request.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn in_memory(tokens: &[(AuthScope, &str)]) -> Self {
        let tokens = tokens
            .iter()
            .map(|(scope, token)| (scope.storage_key().to_string(), token.to_string()))
            .collect();
        Self::new(Arc::new(MemoryTokenStore {
            tokens: Arc::new(RwLock::new(tokens)),
        }))
    }

    /// Current token for `scope`; blank tokens count as absent.
    pub fn token(&self, scope: AuthScope) -> Result<Option<String>, SessionError> {
        Ok(self
            .store
            .get(scope.storage_key())?
            .filter(|token| !token.trim().is_empty()))
    }

    pub fn store_token(&self, scope: AuthScope, token: &str) -> Result<(), SessionError> {
        self.store.set(scope.storage_key(), token.trim())
    }

    pub fn clear(&self, scope: AuthScope) -> Result<(), SessionError> {
        self.store.remove(scope.storage_key())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
