//! Zip archive access: page listing, single-page extraction, verification.
//!
//! A comic archive (`.cbz`) is a plain zip file whose entries are page
//! images. This module is the only place that touches zip internals; the
//! scanner and the CLI build on the three operations here:
//!
//! - [`list_pages`]: the ordered page inventory of one archive
//! - [`extract_page`]: the raw bytes of one page, defensively validated
//! - [`verify_archive`]: a full integrity pass over every member
//!
//! ## Page ordering
//!
//! Entry names are sorted with plain lexicographic ordering on the full
//! name string. Archives in the wild almost always zero-pad page numbers
//! (`001.jpg`, `002.jpg`), which makes lexicographic order the reading
//! order; unpadded names (`2.jpg` after `10.jpg`) sort the way they sort.
//! No numeric-aware comparison is attempted.
//!
//! ## Defensive extraction
//!
//! Libraries accumulate archives from many sources, and a single truncated
//! download or mislabeled file must not take a reader session down with a
//! generic fault. [`extract_page`] therefore checks, in order: the path
//! exists, the file is non-empty, the first four bytes carry a zip
//! signature, the central directory parses, the page is present, and the
//! payload is non-empty. Each check fails with its own [`ArchiveError`]
//! kind so callers can either surface the precise failure or collapse all
//! of them into a single "page unavailable" outcome; both usage modes
//! share the one typed result.
//!
//! ## Statelessness
//!
//! Every operation opens its own file handle and releases it on return.
//! Nothing is cached: two calls against the same path re-read whatever is
//! on disk at that moment, and concurrent calls never share state.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

/// Entry extensions treated as pages, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Reserved entry prefix for macOS resource-fork metadata, always excluded.
const MACOS_METADATA_PREFIX: &str = "__MACOSX";

/// Zip magic numbers accepted by the pre-flight signature check:
/// local file header, end of central directory, and data descriptor.
const ZIP_SIGNATURES: [[u8; 4]; 3] = [*b"PK\x03\x04", *b"PK\x05\x06", *b"PK\x07\x08"];

/// Failure kinds for archive operations.
///
/// Extraction reports one precise kind per failure mode instead of a
/// sentinel empty result, so the boundary layer can distinguish "the
/// archive itself is broken" from "that page is missing". Callers that
/// only need a yes/no collapse the whole enum into "unavailable".
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The container path does not exist.
    #[error("archive not found: {0}")]
    NotFound(PathBuf),
    /// The container exists but is zero bytes long.
    #[error("archive is empty: {0}")]
    EmptyFile(PathBuf),
    /// The container's first bytes are not a zip signature.
    #[error("not a zip archive: {0}")]
    InvalidFormat(PathBuf),
    /// The zip structure is unreadable, or a member failed its
    /// integrity check while being read.
    #[error("corrupt archive {path}: {source}")]
    Corrupt { path: PathBuf, source: ZipError },
    /// The requested page name is absent from the archive.
    #[error("page '{page}' not found in {path}")]
    PageNotFound { path: PathBuf, page: String },
    /// The page exists but its payload is zero bytes.
    #[error("page '{page}' in {path} is empty")]
    EmptyPage { path: PathBuf, page: String },
    /// Listing could not open the container as an archive.
    #[error("failed to open archive {path}: {source}")]
    Open { path: PathBuf, source: ZipError },
    /// Filesystem error while probing the container.
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// List the page entries of an archive, sorted lexicographically.
///
/// Enumerates every entry name, drops macOS metadata entries and anything
/// that is not an image by extension, and sorts the rest. An archive with
/// no image entries yields an empty list, which is valid if unusual.
///
/// The result is computed fresh from the file on every call; callers must
/// not assume it is stable across rewrites of the archive on disk.
pub fn list_pages(container: &Path) -> Result<Vec<String>, ArchiveError> {
    let open_error = |source: ZipError| ArchiveError::Open {
        path: container.to_path_buf(),
        source,
    };
    let file = File::open(container).map_err(|e| open_error(ZipError::Io(e)))?;
    let archive = ZipArchive::new(file).map_err(open_error)?;
    let mut pages: Vec<String> = archive
        .file_names()
        .filter(|name| !name.starts_with(MACOS_METADATA_PREFIX))
        .filter(|name| is_image_entry(name))
        .map(String::from)
        .collect();
    pages.sort();
    Ok(pages)
}

/// Extract the raw bytes of a single page.
///
/// Validation ladder, each step short-circuiting with its own error kind:
///
/// 1. path exists ([`ArchiveError::NotFound`])
/// 2. file is non-empty ([`ArchiveError::EmptyFile`])
/// 3. first four bytes carry a zip signature ([`ArchiveError::InvalidFormat`])
/// 4. zip central directory parses ([`ArchiveError::Corrupt`])
/// 5. `page` is present among the entries ([`ArchiveError::PageNotFound`])
/// 6. the payload reads cleanly and is non-empty
///    ([`ArchiveError::Corrupt`] / [`ArchiveError::EmptyPage`])
///
/// On success the returned bytes are the member's full uncompressed
/// payload, untouched: no decoding, no transcoding.
pub fn extract_page(container: &Path, page: &str) -> Result<Vec<u8>, ArchiveError> {
    preflight(container)?;
    let file = File::open(container).map_err(|source| ArchiveError::Io {
        path: container.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|source| ArchiveError::Corrupt {
        path: container.to_path_buf(),
        source,
    })?;
    let mut entry = match archive.by_name(page) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(ArchiveError::PageNotFound {
                path: container.to_path_buf(),
                page: page.to_string(),
            });
        }
        Err(source) => {
            return Err(ArchiveError::Corrupt {
                path: container.to_path_buf(),
                source,
            });
        }
    };
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| ArchiveError::Corrupt {
            path: container.to_path_buf(),
            source: ZipError::Io(e),
        })?;
    if bytes.is_empty() {
        return Err(ArchiveError::EmptyPage {
            path: container.to_path_buf(),
            page: page.to_string(),
        });
    }
    Ok(bytes)
}

/// Verify an entire archive: pre-flight checks plus a full read of every
/// member, which forces the zip layer's CRC verification.
///
/// Used by the `check` subcommand to sweep a library for broken archives
/// before a reader trips over them.
pub fn verify_archive(container: &Path) -> Result<(), ArchiveError> {
    preflight(container)?;
    let corrupt = |source: ZipError| ArchiveError::Corrupt {
        path: container.to_path_buf(),
        source,
    };
    let file = File::open(container).map_err(|source| ArchiveError::Io {
        path: container.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(corrupt)?;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(corrupt)?;
        io::copy(&mut entry, &mut io::sink()).map_err(|e| corrupt(ZipError::Io(e)))?;
    }
    Ok(())
}

/// Cheap checks before any zip parsing: existence, non-zero size, and the
/// four-byte magic signature.
fn preflight(container: &Path) -> Result<(), ArchiveError> {
    let metadata = match fs::metadata(container) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ArchiveError::NotFound(container.to_path_buf()));
        }
        Err(source) => {
            return Err(ArchiveError::Io {
                path: container.to_path_buf(),
                source,
            });
        }
    };
    if metadata.len() == 0 {
        return Err(ArchiveError::EmptyFile(container.to_path_buf()));
    }
    if !has_zip_signature(container).map_err(|source| ArchiveError::Io {
        path: container.to_path_buf(),
        source,
    })? {
        return Err(ArchiveError::InvalidFormat(container.to_path_buf()));
    }
    Ok(())
}

/// Read up to four bytes and compare against the known zip signatures.
/// A file shorter than four bytes cannot be a zip.
fn has_zip_signature(container: &Path) -> io::Result<bool> {
    let mut header = [0u8; 4];
    let mut file = File::open(container)?;
    let mut filled = 0;
    while filled < header.len() {
        let n = file.read(&mut header[filled..])?;
        if n == 0 {
            return Ok(false);
        }
        filled += n;
    }
    Ok(ZIP_SIGNATURES.contains(&header))
}

fn is_image_entry(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
