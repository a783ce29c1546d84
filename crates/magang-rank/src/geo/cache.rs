//! Persistent geocode cache (normalized name -> coordinates or known-absent).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{GeoError, GeoResult};

const TEMP_EXTENSION: &str = "json.tmp";

/// A geographic coordinate, persisted as `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinates> for (f64, f64) {
    fn from(coords: Coordinates) -> (f64, f64) {
        (coords.lat, coords.lon)
    }
}

/// Outcome of a cache lookup.
///
/// A cached `null` ([`CacheLookup::NotFound`]) is distinct from a name that
/// was never queried ([`CacheLookup::Missing`]): the former suppresses any
/// further provider calls for that name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CacheLookup {
    /// The name resolved to a coordinate.
    Found(Coordinates),
    /// The name is known to be unresolvable.
    NotFound,
    /// The name has never been queried.
    Missing,
}

/// Write-through geocode cache backed by a single JSON document.
///
/// Keys are normalized (trimmed, lowercased) before every lookup and insert.
/// Each store rewrites the whole document via a temp file + rename; writers
/// in other processes are not coordinated (last writer wins).
#[derive(Debug)]
pub struct GeoCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, Option<Coordinates>>>,
}

impl GeoCache {
    /// Loads the cache from `path`.
    ///
    /// A missing, unreadable, or corrupt document degrades to an empty cache.
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Geocode cache document is corrupt, starting empty"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read geocode cache, starting empty"
                );
                HashMap::new()
            }
        };

        debug!(path = %path.display(), entries = entries.len(), "Geocode cache loaded");

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Normalizes a location name into its cache key.
    pub fn normalize_key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Looks up a location name (normalized first).
    pub fn lookup(&self, name: &str) -> CacheLookup {
        let key = Self::normalize_key(name);
        match self.entries.read().get(&key) {
            Some(Some(coords)) => CacheLookup::Found(*coords),
            Some(None) => CacheLookup::NotFound,
            None => CacheLookup::Missing,
        }
    }

    /// Inserts a resolution outcome and rewrites the persisted document.
    ///
    /// `None` records the name as known-absent. The in-memory map and the
    /// document are updated under one write lock, so no partial state is
    /// visible to other in-process callers.
    pub fn store(&self, name: &str, value: Option<Coordinates>) -> GeoResult<()> {
        let key = Self::normalize_key(name);
        let mut entries = self.entries.write();
        entries.insert(key, value);
        Self::persist(&self.path, &entries)
    }

    /// Rewrites the persisted document from the in-memory state.
    pub fn flush(&self) -> GeoResult<()> {
        Self::persist(&self.path, &self.entries.read())
    }

    /// Number of cached entries (including known-absent ones).
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(path: &Path, entries: &HashMap<String, Option<Coordinates>>) -> GeoResult<()> {
        let content = serde_json::to_string(entries)
            .map_err(|source| GeoError::SerializeFailed { source })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| GeoError::PersistFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }

        let temp_path = path.with_extension(TEMP_EXTENSION);
        fs::write(&temp_path, content).map_err(|source| GeoError::PersistFailed {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, path).map_err(|source| GeoError::PersistFailed {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}
