//! Shared test utilities for the comic-shelf test suite.
//!
//! Fixtures are built programmatically: tests write real zip archives into
//! temp directories with [`write_cbz`], so every test exercises the same
//! code paths a user's library does, without binary fixture files in the
//! repository.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write a `.cbz` archive containing the given `(entry name, payload)`
/// pairs, deflate-compressed. Parent directories must already exist.
pub fn write_cbz(path: &Path, entries: &[(&str, &[u8])]) {
    write_with_options(path, entries, SimpleFileOptions::default());
}

/// Like [`write_cbz`] but with stored (uncompressed) members, so tests can
/// locate and mutate a payload byte-for-byte inside the archive file.
pub fn write_cbz_stored(path: &Path, entries: &[(&str, &[u8])]) {
    write_with_options(
        path,
        entries,
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
    );
}

fn write_with_options(path: &Path, entries: &[(&str, &[u8])], options: SimpleFileOptions) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, payload) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(payload).unwrap();
    }
    writer.finish().unwrap();
}

/// Build a small nested library used by scanner and catalog tests:
///
/// ```text
/// root/
/// ├── One Piece/
/// │   ├── One Piece Vol. 1.cbz   (3 pages)
/// │   └── One Piece Vol. 2.cbz   (2 pages)
/// ├── Akira/
/// │   └── Akira Tomo 3.cbz       (1 page)
/// └── oneshot.cbz                (1 page, no series)
/// ```
pub fn sample_library(root: &Path) {
    let one_piece = root.join("One Piece");
    std::fs::create_dir_all(&one_piece).unwrap();
    write_cbz(
        &one_piece.join("One Piece Vol. 1.cbz"),
        &[
            ("001.jpg", b"p1" as &[u8]),
            ("002.jpg", b"p2"),
            ("003.jpg", b"p3"),
        ],
    );
    write_cbz(
        &one_piece.join("One Piece Vol. 2.cbz"),
        &[("001.jpg", b"p1" as &[u8]), ("002.jpg", b"p2")],
    );

    let akira = root.join("Akira");
    std::fs::create_dir_all(&akira).unwrap();
    write_cbz(&akira.join("Akira Tomo 3.cbz"), &[("001.jpg", b"p1" as &[u8])]);

    write_cbz(&root.join("oneshot.cbz"), &[("001.jpg", b"p1" as &[u8])]);
}
