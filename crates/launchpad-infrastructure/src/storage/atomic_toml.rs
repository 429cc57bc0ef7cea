//! Atomic TOML file operations.
//!
//! Writes go through a temporary file in the same directory followed by a
//! rename, so a reader sees either the previous document or the new one and
//! never a torn write. Writers serialize on an exclusive lock file.

use launchpad_core::LaunchpadError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid TOML: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot encode document for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },
    /// The writer lock could not be taken.
    #[error("cannot lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<AtomicTomlError> for LaunchpadError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io { path, source } => {
                LaunchpadError::io(format!("{:?} on {}: {}", source.kind(), path.display(), source))
            }
            AtomicTomlError::Parse { source, .. } => source.into(),
            AtomicTomlError::Encode { source, .. } => source.into(),
            lock @ AtomicTomlError::Lock { .. } => LaunchpadError::data_access(lock.to_string()),
        }
    }
}

/// One serialized `T` kept in a TOML file.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    marker: PhantomData<fn() -> T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            marker: PhantomData,
        }
    }

    /// Parses the document. A missing or blank file yields `None`.
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        let Some(text) = self.read_raw()? else {
            return Ok(None);
        };
        toml::from_str(&text)
            .map(Some)
            .map_err(|source| AtomicTomlError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Returns the document text without parsing it, `None` when missing or
    /// blank. Lets a caller look at the schema version first.
    pub fn read_raw(&self) -> Result<Option<String>, AtomicTomlError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        let _guard = WriterLock::acquire(&self.path)?;
        self.replace_with(data)
    }

    /// Deletes the document. Deleting a missing file succeeds.
    pub fn remove(&self) -> Result<(), AtomicTomlError> {
        let _guard = WriterLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(self.io_error(e)),
            _ => Ok(()),
        }
    }

    fn replace_with(&self, data: &T) -> Result<(), AtomicTomlError> {
        let encoded = toml::to_string_pretty(data).map_err(|source| AtomicTomlError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let staging = staging_path(&self.path).map_err(|e| self.io_error(e))?;
        let written = (|| {
            if let Some(dir) = staging.parent() {
                fs::create_dir_all(dir)?;
            }
            let mut file = File::create(&staging)?;
            file.write_all(encoded.as_bytes())?;
            file.sync_all()?;
            fs::rename(&staging, &self.path)
        })();

        written.map_err(|e| {
            let _ = fs::remove_file(&staging);
            self.io_error(e)
        })
    }

    fn io_error(&self, source: io::Error) -> AtomicTomlError {
        AtomicTomlError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// `dir/name.toml` is staged as `dir/.name.toml.tmp` so the rename stays on
/// one filesystem.
fn staging_path(path: &Path) -> io::Result<PathBuf> {
    match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) => Ok(dir.join(format!(".{}.tmp", name.to_string_lossy()))),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} does not name a file", path.display()),
        )),
    }
}

/// Exclusive writer lock on a sibling `.lock` file, released on drop.
///
/// The lock file stays on disk: removing it would let a waiting writer lock a
/// file that a newcomer no longer sees.
struct WriterLock {
    handle: File,
}

impl WriterLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");
        let to_lock_error = |source| AtomicTomlError::Lock {
            path: lock_path.clone(),
            source,
        };

        if let Some(dir) = lock_path.parent() {
            fs::create_dir_all(dir).map_err(to_lock_error)?;
        }
        let handle = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(to_lock_error)?;
        fs2::FileExt::lock_exclusive(&handle).map_err(to_lock_error)?;

        Ok(Self { handle })
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.handle);
    }
}
