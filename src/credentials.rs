//! Credential store for the inbound access token and the outbound search backend.
//!
//! The store is built once at startup and handed to the authenticator and dispatcher. Request
//! handling reads one [`CredentialSnapshot`] per request; configuration saves swap in a whole new
//! snapshot so readers never observe a half-written value.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;

/// Errors raised while resolving or persisting credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Token file could not be read or written.
    #[error("Failed to access token file {path}: {source}")]
    TokenFile {
        /// Path of the token file.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
}

/// Secret that inbound requests must present in the `X-MCP-Token` header.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredential {
    token: String,
}

impl AccessCredential {
    /// Wrap an existing token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Generate a fresh 32-character opaque token.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().simple().to_string())
    }

    /// Raw token value.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessCredential")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Endpoint and bearer token for the remote search backend.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchBackendCredential {
    /// GraphQL endpoint URL.
    pub endpoint_url: String,
    /// Bearer token sent with every request.
    pub bearer_token: String,
}

impl SearchBackendCredential {
    /// Build a credential when both parts are present and non-empty.
    pub fn from_parts(endpoint_url: Option<&str>, bearer_token: Option<&str>) -> Option<Self> {
        let endpoint_url = endpoint_url.map(str::trim).filter(|v| !v.is_empty())?;
        let bearer_token = bearer_token.map(str::trim).filter(|v| !v.is_empty())?;
        Some(Self {
            endpoint_url: endpoint_url.to_string(),
            bearer_token: bearer_token.to_string(),
        })
    }
}

impl std::fmt::Debug for SearchBackendCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBackendCredential")
            .field("endpoint_url", &self.endpoint_url)
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

/// Immutable view of every credential at one point in time.
#[derive(Debug, Clone)]
pub struct CredentialSnapshot {
    /// Inbound access token.
    pub access: AccessCredential,
    /// Outbound search backend credential; `None` disables the indexing tools.
    pub search: Option<SearchBackendCredential>,
}

/// Process-wide holder of the current credential snapshot.
#[derive(Debug)]
pub struct CredentialStore {
    current: RwLock<Arc<CredentialSnapshot>>,
}

impl CredentialStore {
    /// Create a store around explicit credentials.
    pub fn new(access: AccessCredential, search: Option<SearchBackendCredential>) -> Self {
        Self {
            current: RwLock::new(Arc::new(CredentialSnapshot { access, search })),
        }
    }

    /// Resolve credentials from configuration, generating and persisting the access token when
    /// neither the environment nor the token file supplies one.
    pub fn load(config: &Config) -> Result<Self, CredentialError> {
        let access = match config.access_token.as_deref() {
            Some(token) => AccessCredential::new(token.trim()),
            None => load_or_generate_token(&config.token_file)?,
        };
        let search = SearchBackendCredential::from_parts(
            config.search_endpoint.as_deref(),
            config.search_token.as_deref(),
        );
        if search.is_none() {
            tracing::info!("Search backend credentials not configured; indexing tools will report errors");
        }
        Ok(Self::new(access, search))
    }

    /// Take a consistent snapshot of the current credentials.
    pub fn snapshot(&self) -> Arc<CredentialSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the search backend credential.
    pub fn replace_search_backend(&self, search: Option<SearchBackendCredential>) {
        self.swap(|current| CredentialSnapshot {
            access: current.access.clone(),
            search,
        });
    }

    /// Replace the access token.
    pub fn rotate_access_token(&self, access: AccessCredential) {
        self.swap(|current| CredentialSnapshot {
            access,
            search: current.search.clone(),
        });
    }

    fn swap<F>(&self, update: F)
    where
        F: FnOnce(&CredentialSnapshot) -> CredentialSnapshot,
    {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = update(&guard);
        *guard = Arc::new(next);
    }
}

fn load_or_generate_token(path: &Path) -> Result<AccessCredential, CredentialError> {
    let token_error = |source| CredentialError::TokenFile {
        path: path.to_path_buf(),
        source,
    };

    match fs::read_to_string(path) {
        Ok(contents) if !contents.trim().is_empty() => {
            tracing::debug!(path = %path.display(), "Loaded access token from file");
            return Ok(AccessCredential::new(contents.trim()));
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(token_error(err)),
    }

    let credential = AccessCredential::generate();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(token_error)?;
    }
    fs::write(path, credential.token()).map_err(token_error)?;
    tracing::info!(path = %path.display(), "Generated new MCP access token");
    Ok(credential)
}
