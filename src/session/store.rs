use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::models::domain::user::Identity;
use crate::session::claims;

/// The persisted token pair, stored verbatim in the session file.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenBundle {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// In-memory session. Tokens are wrapped so they never land in debug output;
/// they are exposed only when an Authorization header is built.
pub struct Session {
    access: SecretString,
    #[allow(dead_code)]
    refresh: Option<SecretString>,
    identity: Identity,
}

impl Session {
    fn new(bundle: TokenBundle, identity: Identity) -> Self {
        Self {
            access: SecretString::from(bundle.access),
            refresh: bundle.refresh.map(SecretString::from),
            identity,
        }
    }
}

/// Sole owner of the current session. Consumers receive it by injection
/// (`Arc<SessionStore>`); the API client takes a transient token clone per
/// request and never mutates the session.
pub struct SessionStore {
    path: PathBuf,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Restores the session from the given file. Any failure to read, parse
    /// or decode is logged and treated as logged out.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = Self::restore(&path);
        Self {
            path,
            current: RwLock::new(current),
        }
    }

    fn restore(path: &Path) -> Option<Session> {
        let raw = fs::read_to_string(path).ok()?;

        let bundle: TokenBundle = match serde_json::from_str(&raw) {
            Ok(bundle) => bundle,
            Err(err) => {
                log::warn!("Failed to parse stored tokens, treating as logged out: {}", err);
                return None;
            }
        };

        match claims::decode_unverified(&bundle.access) {
            Ok(decoded) => {
                let identity = decoded.into_identity();
                log::info!("Restored session for user: {}", identity.username);
                Some(Session::new(bundle, identity))
            }
            Err(err) => {
                log::warn!("Stored access token is undecodable, treating as logged out: {}", err);
                None
            }
        }
    }

    /// Installs a new session and persists the token bundle.
    pub fn establish(&self, bundle: TokenBundle, identity: Identity) -> AppResult<()> {
        let serialized = serde_json::to_string(&bundle)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serialized)?;

        let mut current = self.current.write().expect("session lock poisoned");
        *current = Some(Session::new(bundle, identity));
        Ok(())
    }

    /// Drops the session and deletes the session file. A missing file is not
    /// an error.
    pub fn clear(&self) {
        let mut current = self.current.write().expect("session lock poisoned");
        *current = None;
        drop(current);

        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove session file: {}", err);
            }
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        let current = self.current.read().expect("session lock poisoned");
        current.as_ref().map(|s| s.identity.clone())
    }

    pub fn access_token(&self) -> Option<SecretString> {
        let current = self.current.read().expect("session lock poisoned");
        current
            .as_ref()
            .map(|s| SecretString::from(s.access.expose_secret().to_string()))
    }

    pub fn is_logged_in(&self) -> bool {
        let current = self.current.read().expect("session lock poisoned");
        current.is_some()
    }
}
