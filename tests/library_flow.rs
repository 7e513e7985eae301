//! End-to-end exercise of the scan → catalog → extract flow against a real
//! temp library, the way the CLI drives it.

use comic_shelf::archive;
use comic_shelf::catalog::Catalog;
use comic_shelf::config;
use comic_shelf::scan::{self, ScanOptions};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn write_cbz(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, payload) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(payload).unwrap();
    }
    writer.finish().unwrap();
}

fn build_library(root: &Path) {
    let series = root.join("One Piece");
    std::fs::create_dir_all(&series).unwrap();
    write_cbz(
        &series.join("One Piece Vol. 1.cbz"),
        &[
            ("001.jpg", b"first page bytes" as &[u8]),
            ("002.jpg", b"second page bytes"),
        ],
    );
    write_cbz(
        &series.join("One Piece Vol. 2.cbz"),
        &[("001.jpg", b"vol two page" as &[u8])],
    );
    write_cbz(
        &root.join("oneshot.cbz"),
        &[("cover.png", b"cover bytes" as &[u8])],
    );
}

#[test]
fn scan_catalog_extract_round_trip() {
    let tmp = TempDir::new().unwrap();
    build_library(tmp.path());
    let catalog_path = tmp.path().join("catalog.json");

    // First scan: everything is new. Commit as one batch, then save.
    let shelf_config = config::load_config(tmp.path()).unwrap();
    let options = ScanOptions::from_config(&shelf_config.scan);
    let mut catalog = Catalog::load(&catalog_path).unwrap();
    let report = scan::scan(tmp.path(), &catalog.filenames(), &options);
    assert_eq!(report.records.len(), 3);
    assert!(report.failures.is_empty());

    let added = catalog.insert_batch(report.records.clone());
    assert_eq!(added, 3);
    catalog.save(&catalog_path).unwrap();

    // Reload from disk and rescan: nothing new, nothing lost.
    let catalog = Catalog::load(&catalog_path).unwrap();
    assert_eq!(catalog.len(), 3);
    let rescan = scan::scan(tmp.path(), &catalog.filenames(), &options);
    assert!(rescan.records.is_empty());
    assert_eq!(rescan.skipped, 3);

    // Serve side: the cataloged record's pages match the live listing,
    // and extraction returns the exact bytes that were archived.
    let record = catalog.lookup("One Piece/One Piece Vol. 1.cbz").unwrap();
    assert_eq!(record.series, "One Piece");
    assert_eq!(record.volume, 1);
    assert_eq!(record.pages, 2);

    let container = tmp.path().join("One Piece/One Piece Vol. 1.cbz");
    let pages = archive::list_pages(&container).unwrap();
    assert_eq!(pages, vec!["001.jpg", "002.jpg"]);
    assert_eq!(record.pages, pages.len());

    let bytes = archive::extract_page(&container, &pages[1]).unwrap();
    assert_eq!(bytes, b"second page bytes");
}

#[test]
fn new_archives_are_picked_up_incrementally() {
    let tmp = TempDir::new().unwrap();
    build_library(tmp.path());
    let catalog_path = tmp.path().join("catalog.json");

    let mut catalog = Catalog::load(&catalog_path).unwrap();
    let report = scan::scan(tmp.path(), &catalog.filenames(), &ScanOptions::default());
    catalog.insert_batch(report.records.clone());
    catalog.save(&catalog_path).unwrap();

    // A new volume arrives between scans.
    write_cbz(
        &tmp.path().join("One Piece").join("One Piece Vol. 3.cbz"),
        &[("001.jpg", b"vol three" as &[u8])],
    );

    let mut catalog = Catalog::load(&catalog_path).unwrap();
    let report = scan::scan(tmp.path(), &catalog.filenames(), &ScanOptions::default());
    assert_eq!(report.records.len(), 1);
    assert_eq!(
        report.records[0].filename,
        "One Piece/One Piece Vol. 3.cbz"
    );
    assert_eq!(report.records[0].volume, 3);

    catalog.insert_batch(report.records.clone());
    catalog.save(&catalog_path).unwrap();
    assert_eq!(Catalog::load(&catalog_path).unwrap().len(), 4);
}

#[test]
fn broken_archive_degrades_to_diagnostic_everywhere() {
    let tmp = TempDir::new().unwrap();
    build_library(tmp.path());
    std::fs::write(tmp.path().join("broken.cbz"), b"PK\x03\x04 truncated").unwrap();

    // Scan: the broken archive is a diagnostic, not an abort.
    let report = scan::scan(tmp.path(), &Default::default(), &ScanOptions::default());
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.failures.len(), 1);

    // Strict extraction: the precise kind survives to the caller.
    let err = archive::extract_page(&tmp.path().join("broken.cbz"), "001.jpg").unwrap_err();
    assert!(matches!(err, archive::ArchiveError::Corrupt { .. }));

    // Best-effort verification: same failure, collapsed to unavailable.
    let (found, _) = scan::discover(tmp.path(), &ScanOptions::default());
    let broken = found
        .iter()
        .find(|discovered| discovered.key == "broken.cbz")
        .unwrap();
    assert!(archive::verify_archive(&broken.path).is_err());
}
