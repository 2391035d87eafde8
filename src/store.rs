#![forbid(unsafe_code)]

//! Rule artifact storage and the cache-first loader
//!
//! Compiled rule tables are persisted as UTF-8 JSON files. Once an artifact
//! exists it is authoritative: [`load_or_build`] decodes it without any
//! staleness check and only runs the (expensive) builder when it is absent.
//! No locking is done around creation; concurrent first builds race and the
//! last writer wins.

use crate::error::ArtifactError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File cache collaborator
pub trait ArtifactStore {
    /// True if an artifact with this file name exists
    fn exists(&self, name: &str) -> bool;

    /// Reads an artifact as text
    fn read(&self, name: &str) -> Result<String, ArtifactError>;

    /// Writes (or overwrites) an artifact
    fn write(&self, name: &str, text: &str) -> Result<(), ArtifactError>;
}

/// Store backed by a resources directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsArtifactStore { dir: dir.into() }
    }

    /// Picks the first existing directory among `candidates`
    ///
    /// Candidates are ordered development tree first, runtime cache last.
    /// When none exists the last candidate is used and created on first
    /// write. Returns None only for an empty candidate list.
    pub fn resolve(candidates: &[PathBuf]) -> Option<Self> {
        candidates
            .iter()
            .find(|dir| dir.is_dir())
            .or_else(|| candidates.last())
            .map(|dir| FsArtifactStore::new(dir.clone()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of an artifact
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn exists(&self, name: &str) -> bool {
        self.path_of(name).is_file()
    }

    fn read(&self, name: &str) -> Result<String, ArtifactError> {
        let path = self.path_of(name);
        fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::NotFound(path.display().to_string())
            } else {
                ArtifactError::Io { path, source }
            }
        })
    }

    fn write(&self, name: &str, text: &str) -> Result<(), ArtifactError> {
        let path = self.path_of(name);
        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(|source| ArtifactError::Io { path, source })
    }
}

/// In-memory store, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<String, String>>,
    writes: RefCell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an artifact without counting it as a write
    pub fn with_file(self, name: &str, text: &str) -> Self {
        self.files
            .borrow_mut()
            .insert(name.to_string(), text.to_string());
        self
    }

    /// Number of writes performed through [`ArtifactStore::write`]
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.files.borrow().get(name).cloned()
    }
}

impl ArtifactStore for MemoryStore {
    fn exists(&self, name: &str) -> bool {
        self.files.borrow().contains_key(name)
    }

    fn read(&self, name: &str) -> Result<String, ArtifactError> {
        self.get(name)
            .ok_or_else(|| ArtifactError::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, text: &str) -> Result<(), ArtifactError> {
        *self.writes.borrow_mut() += 1;
        self.files
            .borrow_mut()
            .insert(name.to_string(), text.to_string());
        Ok(())
    }
}

/// Layout of a persisted artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Two-space indented, nested structures
    Indented,
    /// One entry per line without indentation, for flat tables
    Flat,
}

/// Result of running a builder
#[derive(Debug)]
pub struct Built<T> {
    pub artifact: T,
    /// False when the build degraded so far that it must not become the
    /// authoritative cached copy (e.g. no source could be loaded)
    pub cacheable: bool,
}

/// Decodes a JSON artifact from the store
pub fn read_json<T: DeserializeOwned>(
    store: &dyn ArtifactStore,
    name: &str,
) -> Result<T, ArtifactError> {
    let text = store.read(name)?;
    serde_json::from_str(&text).map_err(|source| ArtifactError::Decode {
        name: name.to_string(),
        source,
    })
}

/// Encodes an artifact as human-diffable JSON text
pub fn encode<T: Serialize>(name: &str, value: &T, layout: Layout) -> Result<String, ArtifactError> {
    let indent: &[u8] = match layout {
        Layout::Indented => b"  ",
        Layout::Flat => b"",
    };
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut ser)
        .map_err(|source| ArtifactError::Encode {
            name: name.to_string(),
            source,
        })?;
    out.push(b'\n');
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Returns the cached artifact if present, otherwise builds and caches it
///
/// # Errors
///
/// Returns `ArtifactError` if a cached artifact cannot be read or decoded,
/// if the builder fails, or if the built artifact cannot be written.
pub fn load_or_build<T, F>(
    store: &dyn ArtifactStore,
    name: &str,
    layout: Layout,
    build: F,
) -> Result<T, ArtifactError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Result<Built<T>, ArtifactError>,
{
    if store.exists(name) {
        tracing::debug!(artifact = name, "using cached artifact");
        return read_json(store, name);
    }

    let built = build()?;
    if built.cacheable {
        let text = encode(name, &built.artifact, layout)?;
        store.write(name, &text)?;
        tracing::info!(artifact = name, "cached built artifact");
    } else {
        tracing::warn!(artifact = name, "build incomplete, artifact not cached");
    }
    Ok(built.artifact)
}
