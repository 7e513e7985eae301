//! Library scanning: discover archives and build catalog records.
//!
//! Walks a library root looking for comic archives, derives each one's
//! metadata, and produces the records a catalog commit needs:
//!
//! ```text
//! comics/                          # Library root
//! ├── config.toml                  # Scan settings (optional)
//! ├── One Piece/                   # Series folder
//! │   ├── One Piece Vol. 1.cbz
//! │   └── One Piece Vol. 2.cbz
//! ├── Shonen/
//! │   └── Akira/                   # Nesting is fine; series = parent folder
//! │       └── Akira Tomo 3.cbz
//! └── oneshot.cbz                  # Root-level → "No Series"
//! ```
//!
//! ## Incremental scans
//!
//! The scanner is a pure function of `(root, already-cataloged keys)`:
//! archives whose relative path is already known are skipped, everything
//! else becomes a new record. All persistence stays with the caller, which
//! commits the returned records as one batch — so an interrupted scan
//! changes nothing on disk and simply runs again.
//!
//! ## Failure containment
//!
//! One unreadable or corrupt archive must not abort a whole library scan.
//! Per-container failures are collected as [`ScanDiagnostic`] entries in
//! the report and the walk moves on. Only the report says what went wrong;
//! nothing is printed from here.
//!
//! ## Parallelism
//!
//! Counting pages means opening every new archive, which dominates scan
//! time on large libraries. Page counting fans out on the rayon thread
//! pool; results are collected back in discovery order (the walk is
//! sorted), so record order — and therefore catalog order — is identical
//! run to run.

use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::archive;
use crate::catalog::ComicRecord;
use crate::config::ScanSection;
use crate::naming;

/// Scanner settings, normally taken from [`ScanSection`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extensions (no leading dot) treated as archives, case-insensitive.
    pub archive_extensions: Vec<String>,
    /// Whether the walk follows symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&ScanSection::default())
    }
}

impl ScanOptions {
    pub fn from_config(section: &ScanSection) -> Self {
        Self {
            archive_extensions: section.archive_extensions.clone(),
            follow_symlinks: section.follow_symlinks,
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| {
                self.archive_extensions
                    .iter()
                    .any(|wanted| ext.eq_ignore_ascii_case(wanted))
            })
    }
}

/// A non-fatal problem encountered during a scan.
#[derive(Debug, Clone)]
pub struct ScanDiagnostic {
    pub path: PathBuf,
    pub message: String,
}

/// Everything a scan produced. Committing `records` is the caller's job.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// New records, in discovery order.
    pub records: Vec<ComicRecord>,
    /// Archives skipped because their key was already cataloged.
    pub skipped: usize,
    /// Per-container failures and walk-level warnings.
    pub failures: Vec<ScanDiagnostic>,
}

/// An archive found on disk: its catalog key and its absolute path.
pub struct Discovered {
    /// Path relative to the root, forward-slash separated.
    pub key: String,
    pub path: PathBuf,
}

/// Walk the root and list every archive, sorted by path.
///
/// Unreadable directory entries become diagnostics; the walk continues.
/// A missing root yields no archives and a single warning diagnostic.
pub fn discover(root: &Path, options: &ScanOptions) -> (Vec<Discovered>, Vec<ScanDiagnostic>) {
    if !root.is_dir() {
        return (
            Vec::new(),
            vec![ScanDiagnostic {
                path: root.to_path_buf(),
                message: "library root does not exist".to_string(),
            }],
        );
    }

    let mut found = Vec::new();
    let mut failures = Vec::new();
    let walk = WalkDir::new(root)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name();
    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                failures.push(ScanDiagnostic {
                    path: e.path().map(Path::to_path_buf).unwrap_or_default(),
                    message: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() || !options.matches_extension(entry.path()) {
            continue;
        }
        match relative_key(entry.path(), root) {
            Some(key) => found.push(Discovered {
                key,
                path: entry.path().to_path_buf(),
            }),
            None => failures.push(ScanDiagnostic {
                path: entry.path().to_path_buf(),
                message: "path is not under the library root".to_string(),
            }),
        }
    }
    (found, failures)
}

/// Scan the library and build records for every archive not yet cataloged.
///
/// Pure with respect to persistence: `existing` is the caller's set of
/// known filename keys, and the returned report is the only output.
pub fn scan(root: &Path, existing: &HashSet<String>, options: &ScanOptions) -> ScanReport {
    let (found, mut failures) = discover(root, options);

    let mut skipped = 0;
    let fresh: Vec<Discovered> = found
        .into_iter()
        .filter(|discovered| {
            if existing.contains(&discovered.key) {
                skipped += 1;
                false
            } else {
                true
            }
        })
        .collect();

    // Page counting opens every archive; fan out, then fold results back
    // in discovery order.
    let outcomes: Vec<Result<ComicRecord, ScanDiagnostic>> = fresh
        .par_iter()
        .map(|discovered| build_record(discovered, root))
        .collect();

    let mut records = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(record) => records.push(record),
            Err(failure) => failures.push(failure),
        }
    }

    ScanReport {
        records,
        skipped,
        failures,
    }
}

fn build_record(discovered: &Discovered, root: &Path) -> Result<ComicRecord, ScanDiagnostic> {
    let pages = archive::list_pages(&discovered.path).map_err(|e| ScanDiagnostic {
        path: discovered.path.clone(),
        message: e.to_string(),
    })?;
    let title = naming::derive_title(&discovered.path);
    let volume = naming::derive_volume(&title);
    let series = naming::derive_series(&discovered.path, root);
    Ok(ComicRecord {
        filename: discovered.key.clone(),
        title,
        series,
        volume,
        pages: pages.len(),
    })
}

/// Path relative to the root, joined with forward slashes regardless of
/// platform separator.
fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
