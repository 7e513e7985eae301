//! Filename and path heuristics for series, title, and volume metadata.
//!
//! Comic archives rarely carry usable embedded metadata, so everything on a
//! catalog record is derived from the archive's name and its position in the
//! library tree:
//!
//! - **Title**: the filename stem. `One Piece Vol. 12.cbz` → "One Piece Vol. 12"
//! - **Series**: the immediate parent directory name. Archives sitting
//!   directly in the library root get the [`NO_SERIES`] label.
//! - **Volume**: the first integer captured by an ordered pattern list
//!   (below). Names with no usable number get [`UNKNOWN_VOLUME`], which
//!   sorts after every real volume.
//!
//! ## Volume patterns
//!
//! Patterns are tried in a fixed priority order; the first capture wins:
//!
//! 1. An explicit volume marker — `vol`, `vol.`, `volume`, or `tomo` —
//!    followed by optional separators and digits (`Vol. 12`, `tomo_3`).
//! 2. A bare number, optionally preceded by `#` (`#4`, `Series 07`).
//! 3. A chapter marker: `cap` followed by optional separators and digits.
//!
//! Pattern 2 matches almost any digit run, so on names containing a numeral
//! it fires before the chapter pattern ever gets a chance (`Cap 07` →
//! volume 7 via pattern 2, not pattern 3). The sort order of existing
//! catalogs depends on this priority; do not reorder.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Sentinel volume for archives whose name yields no number.
///
/// Chosen high so unknown volumes sort after every real volume.
pub const UNKNOWN_VOLUME: u32 = 9999;

/// Series label for archives sitting directly in the library root.
pub const NO_SERIES: &str = "No Series";

static VOLUME_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)(?:vol\.?|volume|tomo)[\s._-]*(\d+)").unwrap(),
        Regex::new(r"(?i)#?(\d+)").unwrap(),
        Regex::new(r"(?i)cap[\s._-]*(\d+)").unwrap(),
    ]
});

/// Derive a volume number from an archive name.
///
/// Applies the module-level pattern list in priority order and returns the
/// first captured integer, or [`UNKNOWN_VOLUME`] when nothing matches.
/// A captured digit run too large for `u32` is treated as no match for that
/// pattern rather than an error.
///
/// ```
/// use comic_shelf::naming::{derive_volume, UNKNOWN_VOLUME};
///
/// assert_eq!(derive_volume("One Piece Vol. 12"), 12);
/// assert_eq!(derive_volume("Akira #4"), 4);
/// assert_eq!(derive_volume("Oneshot"), UNKNOWN_VOLUME);
/// ```
pub fn derive_volume(name: &str) -> u32 {
    for pattern in VOLUME_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(name)
            && let Ok(volume) = captures[1].parse::<u32>()
        {
            return volume;
        }
    }
    UNKNOWN_VOLUME
}

/// Derive a series name from an archive's position in the library tree.
///
/// The series is the name of the archive's immediate parent directory.
/// Archives sitting directly in the library root belong to no series and
/// get the [`NO_SERIES`] label. The parent is compared to `root` by path,
/// not by name, so a nested folder that happens to share the root's name
/// still counts as a series.
pub fn derive_series(container: &Path, root: &Path) -> String {
    container
        .parent()
        .filter(|parent| *parent != root)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| NO_SERIES.to_string())
}

/// Derive a display title from an archive path: the filename without its
/// extension.
pub fn derive_title(container: &Path) -> String {
    container
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn explicit_volume_marker() {
        assert_eq!(derive_volume("One Piece Vol. 12"), 12);
        assert_eq!(derive_volume("One Piece vol 3"), 3);
        assert_eq!(derive_volume("Saga Volume 2"), 2);
        assert_eq!(derive_volume("Akira tomo-5"), 5);
    }

    #[test]
    fn volume_marker_with_mixed_separators() {
        assert_eq!(derive_volume("Blame Vol._-7"), 7);
        assert_eq!(derive_volume("Blame VOLUME   10"), 10);
    }

    #[test]
    fn bare_number_and_hash() {
        assert_eq!(derive_volume("Akira #4"), 4);
        assert_eq!(derive_volume("Berserk 07"), 7);
        assert_eq!(derive_volume("2001 Nights"), 2001);
    }

    #[test]
    fn chapter_marker_preempted_by_bare_digits() {
        // "Cap 07" contains a digit run, so the bare-number pattern fires
        // before the chapter pattern is ever tried.
        assert_eq!(derive_volume("Series Cap 07"), 7);
    }

    #[test]
    fn chapter_marker_alone() {
        // Only reachable when the name has a chapter marker but the earlier
        // patterns fail — which requires digits the bare pattern also sees,
        // so the chapter pattern is effectively shadowed. Documented
        // behavior, kept for compatibility.
        assert_eq!(derive_volume("Cap 3"), 3);
    }

    #[test]
    fn no_number_gives_sentinel() {
        assert_eq!(derive_volume("Oneshot"), UNKNOWN_VOLUME);
        assert_eq!(derive_volume(""), UNKNOWN_VOLUME);
    }

    #[test]
    fn volume_marker_wins_over_earlier_bare_number() {
        // The explicit marker is matched first even when a bare number
        // appears earlier in the name.
        assert_eq!(derive_volume("20th Century Boys Vol. 3"), 3);
    }

    #[test]
    fn oversized_digit_run_falls_back_to_sentinel() {
        assert_eq!(derive_volume("Series 99999999999999"), UNKNOWN_VOLUME);
    }

    #[test]
    fn series_from_parent_directory() {
        let root = PathBuf::from("/library");
        let container = root.join("One Piece/One Piece Vol. 1.cbz");
        assert_eq!(derive_series(&container, &root), "One Piece");
    }

    #[test]
    fn series_from_nested_parent() {
        let root = PathBuf::from("/library");
        let container = root.join("Shonen/One Piece/One Piece Vol. 1.cbz");
        assert_eq!(derive_series(&container, &root), "One Piece");
    }

    #[test]
    fn root_level_archive_has_no_series() {
        let root = PathBuf::from("/library");
        let container = root.join("oneshot.cbz");
        assert_eq!(derive_series(&container, &root), NO_SERIES);
    }

    #[test]
    fn nested_folder_sharing_root_name_is_a_series() {
        let root = PathBuf::from("/library");
        let container = root.join("library/oneshot.cbz");
        assert_eq!(derive_series(&container, &root), "library");
    }

    #[test]
    fn title_strips_extension() {
        assert_eq!(
            derive_title(Path::new("/library/Akira/Akira Vol. 1.cbz")),
            "Akira Vol. 1"
        );
    }

    #[test]
    fn title_keeps_inner_dots() {
        assert_eq!(
            derive_title(Path::new("Series.Vol.2.cbz")),
            "Series.Vol.2"
        );
    }
}
