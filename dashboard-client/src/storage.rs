//! Persistence adapter for the session token.
//!
//! The token is the only thing the client persists. Every read and write goes
//! through a [`TokenStore`] so the session has a single source of truth.

use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tracing::debug;

/// Failure to read, write or remove the persisted token.
#[derive(Debug, thiserror::Error)]
#[error("token storage at {path} failed: {source}")]
pub struct StorageError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl StorageError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Load, save and clear a single opaque token.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Returns the persisted token; `None` means anonymous.
    ///
    /// # Errors
    /// Returns an error when storage exists but cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persists `token`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error when storage cannot be written.
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Removes the persisted token. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error when existing storage cannot be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Token kept in a single file, readable only by the owner on Unix.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store backed by `path`; parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::new(&self.path, err)),
        }
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| StorageError::new(parent, err))?;
            }
        }
        write_private(&self.path, token).map_err(|err| StorageError::new(&self.path, err))?;
        debug!(path = %self.path.display(), "persisted session token");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed session token");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::new(&self.path, err)),
        }
    }
}

/// Writes `token` to `path`, owner-only on Unix from the moment it exists.
/// A file left by an earlier run is narrowed before the token lands in it.
fn write_private(path: &Path, token: &str) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(token.as_bytes())
}

/// Process-local store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`, as if persisted by an earlier run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Current contents, for inspection.
    pub fn peek(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.peek())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
