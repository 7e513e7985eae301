//! # Comic Shelf
//!
//! A cataloger and page extractor for comic-book archives. Your filesystem
//! is the data source: a library is a directory tree of `.cbz` files,
//! series are folders, and volume numbers are inferred from filenames.
//! Comic Shelf scans that tree into a browsable catalog and pulls single
//! page images out of archives on demand.
//!
//! # Architecture: Scan, Then Serve
//!
//! The crate splits cleanly in two:
//!
//! ```text
//! 1. Scan     library/  →  catalog.json   (filesystem → catalog records)
//! 2. Serve    archive + page name → raw image bytes, on demand
//! ```
//!
//! The catalog is derived data. Nothing in an archive is ever modified,
//! and no state is held between calls: every operation opens the file,
//! does its work, and lets go. This keeps the serve side safe to call
//! concurrently and makes the scan side a pure function of
//! (root, already-known keys) that is trivial to test against temp
//! directories.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the library, skips known archives, builds new catalog records |
//! | [`archive`] | Zip access: page listing, defensive single-page extraction, verification |
//! | [`naming`] | Series/title/volume heuristics from filenames and folder layout |
//! | [`catalog`] | The record type and the versioned `catalog.json` manifest |
//! | [`config`] | Optional `config.toml` at the library root |
//! | [`output`] | CLI output formatting — pure formatters plus print wrappers |
//!
//! # Design Decisions
//!
//! ## Zip Only
//!
//! A `.cbz` is a zip file by definition, and zip is the only container
//! format read here. Rar-based `.cbr` siblings are deliberately out:
//! supporting them would drag in a non-free decoder for a shrinking slice
//! of real-world libraries. Extraction is byte-level: pages are returned
//! exactly as stored, never decoded or transcoded, so serving a page costs
//! one member read regardless of image format.
//!
//! ## Defense In Depth On Extraction
//!
//! Archives arrive from scanners, downloads, and decade-old backups;
//! truncated and mislabeled files are a fact of life. Extraction validates
//! in layers (existence, non-zero size, zip signature, archive structure,
//! page presence, payload) and reports which layer failed as a typed
//! error. Callers that can degrade (skip the page, mark it unavailable)
//! collapse the error; callers that can't get the precise kind.
//!
//! ## Lexicographic Page Order
//!
//! Pages are served in plain lexicographic order of their entry names.
//! Real archives zero-pad page numbers, which makes that the reading
//! order; building a natural-sort tower for the exceptions buys little
//! and costs determinism across tools that touch the same archive.
//!
//! ## Append-Only Catalog
//!
//! A scan only ever adds records for unknown filenames; existing records
//! are never refreshed or deleted. Rescans are cheap, interrupted scans
//! change nothing, and the catalog file stays a plain JSON document you
//! can read, diff, and delete. Deleting it simply means the next scan
//! rebuilds everything.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod naming;
pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
