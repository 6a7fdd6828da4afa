//! Credential persistence.
//!
//! A [`TokenStore`] holds at most one bearer credential. Native builds persist
//! it to a file in the user's configuration directory; browser builds use
//! `localStorage`; tests and embedders use [`MemoryTokenStore`].

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use crate::error::ClientError;

/// Name of the stored credential: the `localStorage` key in browsers.
pub const STORAGE_KEY: &str = "access_token";

const BEARER_SCHEME: &str = "Bearer";

/// An opaque bearer credential.
///
/// Construction rejects values that cannot be a credential, so anything
/// holding a `Credential` holds a non-empty token. The token is redacted from
/// `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Accept a raw stored or received value.
    ///
    /// Leading/trailing whitespace and an existing `Bearer ` prefix are
    /// stripped. Empty values and the literals `undefined` / `null`, which a
    /// broken browser write leaves behind, are rejected.
    #[must_use]
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        let token = match trimmed.strip_prefix(BEARER_SCHEME) {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
            _ => trimmed,
        };
        if token.is_empty() || token == "undefined" || token == "null" {
            return None;
        }
        Some(Self(token.to_string()))
    }

    /// The bare token, without any `Bearer ` prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Storage for the current session credential.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Persist `credential`, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`ClientError::Storage`] when the backing store rejects the write.
    fn save(&self, credential: &Credential) -> Result<(), ClientError>;

    /// The stored credential, if one is present and well formed.
    fn load(&self) -> Option<Credential>;

    /// Forget the stored credential.
    ///
    /// # Errors
    /// Returns [`ClientError::Storage`] when the backing store rejects the removal.
    fn clear(&self) -> Result<(), ClientError>;
}

/// Process-local store. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with an arbitrary raw value, as if an earlier session
    /// had written it. The value is not validated until [`TokenStore::load`].
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The raw stored value, bypassing validation.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }

    fn write(&self, value: Option<String>) -> Result<(), ClientError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| ClientError::Storage("token slot lock poisoned".to_string()))?;
        *guard = value;
        Ok(())
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, credential: &Credential) -> Result<(), ClientError> {
        self.write(Some(credential.as_str().to_string()))
    }

    fn load(&self) -> Option<Credential> {
        self.raw().and_then(Credential::parse)
    }

    fn clear(&self) -> Result<(), ClientError> {
        self.write(None)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileTokenStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::{
        fs, io,
        path::{Path, PathBuf},
    };

    use directories::BaseDirs;
    use tracing::{debug, warn};

    use super::{Credential, TokenStore};
    use crate::error::ClientError;

    /// Credential kept in a single file that only the current user can read.
    #[derive(Debug, Clone)]
    pub struct FileTokenStore {
        path: PathBuf,
    }

    impl FileTokenStore {
        #[must_use]
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `<config dir>/carebridge/session.token`, or `./session.token` when
        /// the platform has no configuration directory.
        #[must_use]
        pub fn default_path() -> PathBuf {
            BaseDirs::new().map_or_else(
                || PathBuf::from("./session.token"),
                |dirs| dirs.config_dir().join("carebridge").join("session.token"),
            )
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn storage_error(&self, action: &str, err: &io::Error) -> ClientError {
            ClientError::Storage(format!(
                "failed to {action} {}: {err}",
                self.path.display()
            ))
        }
    }

    impl TokenStore for FileTokenStore {
        fn save(&self, credential: &Credential) -> Result<(), ClientError> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|err| self.storage_error("create directory for", &err))?;
            }
            fs::write(&self.path, credential.as_str().as_bytes())
                .map_err(|err| self.storage_error("write", &err))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                    .map_err(|err| self.storage_error("restrict permissions on", &err))?;
            }
            debug!(path = %self.path.display(), "stored session credential");
            Ok(())
        }

        fn load(&self) -> Option<Credential> {
            match fs::read_to_string(&self.path) {
                Ok(contents) => Credential::parse(contents),
                Err(err) if err.kind() == io::ErrorKind::NotFound => None,
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err, "unable to read session credential");
                    None
                }
            }
        }

        fn clear(&self) -> Result<(), ClientError> {
            match fs::remove_file(&self.path) {
                Ok(()) => {
                    debug!(path = %self.path.display(), "removed session credential");
                    Ok(())
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(self.storage_error("remove", &err)),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTokenStore;

#[cfg(target_arch = "wasm32")]
mod browser {
    use gloo_storage::{LocalStorage, Storage};

    use super::{Credential, STORAGE_KEY, TokenStore};
    use crate::error::ClientError;

    /// Credential kept in the browser's `localStorage` for this origin.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct BrowserTokenStore;

    impl TokenStore for BrowserTokenStore {
        fn save(&self, credential: &Credential) -> Result<(), ClientError> {
            LocalStorage::raw()
                .set_item(STORAGE_KEY, credential.as_str())
                .map_err(|_| ClientError::Storage("localStorage rejected the write".to_string()))
        }

        fn load(&self) -> Option<Credential> {
            LocalStorage::raw()
                .get_item(STORAGE_KEY)
                .ok()
                .flatten()
                .and_then(Credential::parse)
        }

        fn clear(&self) -> Result<(), ClientError> {
            LocalStorage::delete(STORAGE_KEY);
            Ok(())
        }
    }
}
