//! # Repository
//!
//! Storage boundary for entity collections. A repository only knows how to load the
//! whole ordered collection and replace it wholesale; the resource actor computes
//! every new collection and hands it over with [`Repository::save`].
//!
//! Neither implementation coordinates writers across processes. Inside one process
//! the owning [`ResourceActor`](crate::actor_framework::ResourceActor) serializes
//! access, which is the only writer discipline this crate provides.

use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed catalog data in {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Repository lock poisoned")]
    Poisoned,
}

/// Whole-collection storage for a sequence of records.
pub trait Repository<T>: Send + Sync + 'static {
    /// Returns the full collection in stored order.
    fn load(&self) -> Result<Vec<T>, RepositoryError>;

    /// Replaces the stored collection with `items`.
    fn save(&self, items: &[T]) -> Result<(), RepositoryError>;
}

/// Process-local repository, mostly for tests and the demo binary.
#[derive(Debug, Default)]
pub struct InMemoryRepository<T> {
    items: Mutex<Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self { items: Mutex::new(Vec::new()) }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self { items: Mutex::new(items) }
    }
}

impl<T: Clone + Send + 'static> Repository<T> for InMemoryRepository<T> {
    fn load(&self) -> Result<Vec<T>, RepositoryError> {
        let items = self.items.lock().map_err(|_| RepositoryError::Poisoned)?;
        Ok(items.clone())
    }

    fn save(&self, items: &[T]) -> Result<(), RepositoryError> {
        let mut stored = self.items.lock().map_err(|_| RepositoryError::Poisoned)?;
        *stored = items.to_vec();
        Ok(())
    }
}

/// Stores the collection as a pretty-printed JSON array.
///
/// A missing file loads as an empty collection. Saves go to a sibling temporary
/// file that is then renamed over the target.
#[derive(Debug)]
pub struct JsonFileRepository<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileRepository<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn serde_error(&self, source: serde_json::Error) -> RepositoryError {
        RepositoryError::Serialization {
            path: self.path.clone(),
            source,
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl<T> Repository<T> for JsonFileRepository<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<T>, RepositoryError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Data file missing, starting from an empty collection");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let items: Vec<T> = serde_json::from_reader(BufReader::new(file)).map_err(|e| self.serde_error(e))?;
        debug!(count = items.len(), "Collection loaded");
        Ok(items)
    }

    #[instrument(skip(self, items), fields(path = %self.path.display(), count = items.len()))]
    fn save(&self, items: &[T]) -> Result<(), RepositoryError> {
        let staging = self.staging_path();
        let file = fs::File::create(&staging).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, items).map_err(|e| self.serde_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))?;
        drop(writer);

        fs::rename(&staging, &self.path).map_err(|e| self.io_error(e))?;
        debug!("Collection saved");
        Ok(())
    }
}
