//! Catalog records and the on-disk catalog manifest.
//!
//! The catalog is the browsing index of the library: one record per
//! archive, derived entirely from the archive's name, location, and page
//! inventory at scan time. It is persisted as a single JSON manifest
//! (`catalog.json`) living alongside the library.
//!
//! ## Record lifecycle
//!
//! Records are created once per distinct filename and never mutated
//! afterwards. A rescan only *adds* records for filenames the catalog has
//! not seen; it does not refresh existing ones, so a page count can go
//! stale if an archive is rewritten in place. That trade keeps rescans
//! cheap and makes the scan → insert → save sequence idempotent: scanning
//! an unchanged library twice adds nothing the second time.
//!
//! ## Batch commits
//!
//! [`Catalog::insert_batch`] + [`Catalog::save`] commit a scan's records in
//! one write. A scan interrupted before `save` leaves the previous manifest
//! untouched, so the next scan re-detects the same archives as new instead
//! of half of them.
//!
//! ## Versioning
//!
//! The manifest carries a format version. A mismatched version loads as an
//! empty catalog — records are derived data and a rescan rebuilds them.
//! A manifest of the current version that fails to parse is an error
//! instead: silently discarding a readable user's index would make the
//! next scan re-add everything and hide the underlying problem.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::naming::UNKNOWN_VOLUME;

/// Default manifest filename, resolved relative to the library root.
pub const CATALOG_FILENAME: &str = "catalog.json";

/// Version of the catalog manifest format. Bump to invalidate existing
/// manifests when the record shape changes.
const CATALOG_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Derived summary of one archive in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicRecord {
    /// Path relative to the library root, forward-slash separated.
    /// Unique key across the catalog.
    pub filename: String,
    /// Archive filename without its extension.
    pub title: String,
    /// Parent directory name, or the no-series label for root-level archives.
    pub series: String,
    /// Volume number derived from the title, `9999` when unknown.
    pub volume: u32,
    /// Number of page entries at scan time. Not refreshed by rescans.
    pub pages: usize,
}

impl ComicRecord {
    /// Sort key for display: series, then volume (unknown volumes last
    /// within their series), then title as tiebreaker.
    pub fn sort_key(&self) -> (&str, u32, &str) {
        (&self.series, self.volume, &self.title)
    }

    /// Whether the volume number is the "could not infer" sentinel.
    pub fn volume_unknown(&self) -> bool {
        self.volume == UNKNOWN_VOLUME
    }
}

/// On-disk catalog manifest: the record list plus a format version.
///
/// Lookups go through a runtime filename index rebuilt at load time;
/// the serialized form is just the version and the records, in insertion
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    records: Vec<ComicRecord>,
    /// Runtime index: filename → position in `records`. Never serialized.
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog (first scan, or version rollover).
    pub fn empty() -> Self {
        Self {
            version: CATALOG_VERSION,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Load a catalog manifest.
    ///
    /// A missing file or a version mismatch yields an empty catalog; an
    /// unreadable or unparseable file of the current format is an error.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::empty()),
            Err(e) => return Err(e.into()),
        };
        let mut catalog: Self = serde_json::from_str(&content)?;
        if catalog.version != CATALOG_VERSION {
            return Ok(Self::empty());
        }
        catalog.index = build_index(&catalog.records);
        Ok(catalog)
    }

    /// Write the manifest to `path` in one shot.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Look up a record by its filename key.
    pub fn lookup(&self, filename: &str) -> Option<&ComicRecord> {
        self.index.get(filename).map(|&at| &self.records[at])
    }

    /// The set of filename keys already cataloged, as fed to the scanner.
    pub fn filenames(&self) -> HashSet<String> {
        self.index.keys().cloned().collect()
    }

    /// Insert records whose filenames are not yet present, preserving
    /// their order. Returns how many were actually added.
    pub fn insert_batch(&mut self, records: Vec<ComicRecord>) -> usize {
        let mut added = 0;
        for record in records {
            if self.index.contains_key(&record.filename) {
                continue;
            }
            self.index.insert(record.filename.clone(), self.records.len());
            self.records.push(record);
            added += 1;
        }
        added
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[ComicRecord] {
        &self.records
    }

    /// Records sorted for display: series, volume, title.
    pub fn sorted_records(&self) -> Vec<&ComicRecord> {
        let mut sorted: Vec<&ComicRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        sorted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn build_index(records: &[ComicRecord]) -> HashMap<String, usize> {
    records
        .iter()
        .enumerate()
        .map(|(at, record)| (record.filename.clone(), at))
        .collect()
}
