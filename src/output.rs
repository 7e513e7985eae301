//! CLI output formatting for all subcommands.
//!
//! Output is information-centric: the primary display for every record is
//! its semantic identity — series, title, page count — with the archive
//! path shown as secondary context via an indented `Source:` line.
//!
//! ## Output Format
//!
//! ### Scan
//!
//! ```text
//! New comics
//! 001 Akira (1 new)
//!     001 Akira Tomo 3 (1 page)
//!         Source: Akira/Akira Tomo 3.cbz
//! 002 One Piece (2 new)
//!     001 One Piece Vol. 1 (3 pages)
//!         Source: One Piece/One Piece Vol. 1.cbz
//!
//! Added 3 comics (1 skipped, 0 failed)
//! ```
//!
//! ### Pages
//!
//! ```text
//! Pages in One Piece Vol. 1.cbz
//! 001 001.jpg
//! 002 002.jpg
//!
//! 2 pages
//! ```
//!
//! ### Check
//!
//! ```text
//! 001 Akira/Akira Tomo 3.cbz: ok
//! 002 broken.cbz: unavailable (not a zip archive: broken.cbz)
//!
//! Checked 2 archives, 1 unavailable
//! ```
//!
//! ## Architecture
//!
//! Each subcommand has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::catalog::{Catalog, ComicRecord};
use crate::scan::ScanReport;
use std::path::Path;

/// Outcome of verifying one archive, as displayed by `check`.
pub struct CheckOutcome {
    /// Catalog key (path relative to the library root).
    pub key: String,
    /// `None` when the archive verified cleanly; otherwise the diagnostic.
    pub problem: Option<String>,
}

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `3 pages`, `0 pages`.
fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Format a scan report: new records grouped by series, then skip and
/// failure summaries.
pub fn format_scan_output(report: &ScanReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.records.is_empty() {
        lines.push("New comics".to_string());
        push_series_groups(&mut lines, report.records.iter(), "new");
    }

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push("Failures".to_string());
        for failure in &report.failures {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                failure.path.display(),
                failure.message
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Added {} ({} skipped, {} failed)",
        count_label(report.records.len(), "comic"),
        report.skipped,
        report.failures.len()
    ));
    lines
}

pub fn print_scan_output(report: &ScanReport) {
    for line in format_scan_output(report) {
        println!("{line}");
    }
}

/// Group records by series, preserving record order within and across
/// groups (first appearance wins the group's position).
fn group_by_series<'a>(
    records: impl Iterator<Item = &'a ComicRecord>,
) -> Vec<(&'a str, Vec<&'a ComicRecord>)> {
    let mut groups: Vec<(&str, Vec<&ComicRecord>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(series, _)| *series == record.series) {
            Some((_, members)) => members.push(record),
            None => groups.push((record.series.as_str(), vec![record])),
        }
    }
    groups
}

/// Append the two-level series → comics tree shared by scan and list
/// output. `counted` labels the per-series count ("new", "comics").
fn push_series_groups<'a>(
    lines: &mut Vec<String>,
    records: impl Iterator<Item = &'a ComicRecord>,
    counted: &str,
) {
    for (at, (series, members)) in group_by_series(records).iter().enumerate() {
        lines.push(format!(
            "{} {} ({} {counted})",
            format_index(at + 1),
            series,
            members.len()
        ));
        for (pos, record) in members.iter().enumerate() {
            lines.push(format!(
                "{}{} {} ({})",
                indent(1),
                format_index(pos + 1),
                record.title,
                count_label(record.pages, "page")
            ));
            lines.push(format!("{}Source: {}", indent(2), record.filename));
        }
    }
}

// ============================================================================
// List
// ============================================================================

/// Format the whole catalog, sorted by series, then volume, then title.
pub fn format_catalog_output(catalog: &Catalog) -> Vec<String> {
    if catalog.is_empty() {
        return vec!["Catalog is empty (run 'comic-shelf scan' first)".to_string()];
    }

    let sorted = catalog.sorted_records();
    let series_count = group_by_series(sorted.iter().copied()).len();

    let mut lines = vec!["Catalog".to_string()];
    push_series_groups(&mut lines, sorted.into_iter(), "cataloged");
    lines.push(String::new());
    lines.push(format!(
        "{} in {series_count} series",
        count_label(catalog.len(), "comic")
    ));
    lines
}

pub fn print_catalog_output(catalog: &Catalog) {
    for line in format_catalog_output(catalog) {
        println!("{line}");
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Format a page inventory for one archive.
pub fn format_pages_output(container: &Path, pages: &[String]) -> Vec<String> {
    let name = container
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| container.display().to_string());

    let mut lines = vec![format!("Pages in {name}")];
    for (pos, page) in pages.iter().enumerate() {
        lines.push(format!("{} {}", format_index(pos + 1), page));
    }
    lines.push(String::new());
    lines.push(count_label(pages.len(), "page"));
    lines
}

pub fn print_pages_output(container: &Path, pages: &[String]) {
    for line in format_pages_output(container, pages) {
        println!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format a library verification sweep, one line per archive.
pub fn format_check_output(outcomes: &[CheckOutcome]) -> Vec<String> {
    let mut lines = Vec::new();
    for (pos, outcome) in outcomes.iter().enumerate() {
        match &outcome.problem {
            None => lines.push(format!("{} {}: ok", format_index(pos + 1), outcome.key)),
            Some(problem) => lines.push(format!(
                "{} {}: unavailable ({problem})",
                format_index(pos + 1),
                outcome.key
            )),
        }
    }
    let broken = outcomes.iter().filter(|o| o.problem.is_some()).count();
    lines.push(String::new());
    lines.push(format!(
        "Checked {}, {} unavailable",
        count_label(outcomes.len(), "archive"),
        broken
    ));
    lines
}

pub fn print_check_output(outcomes: &[CheckOutcome]) {
    for line in format_check_output(outcomes) {
        println!("{line}");
    }
}
