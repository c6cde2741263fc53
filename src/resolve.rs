// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Collision-free destination paths

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::{Result, SnapnameError};

/// Pick a destination next to `source` named after `stem`
///
/// The source keeps its extension. `stem.ext` is tried first, then
/// `stem_1.ext`, `stem_2.ext` and so on. A candidate is free when nothing
/// exists there or when it is the source itself. Only existence checks are
/// made, so another process can still claim the path before the rename.
///
/// `max_attempts` caps the suffixed probes; `0` leaves them unbounded.
pub fn resolve(source: &Path, stem: &str, max_attempts: u32) -> Result<PathBuf> {
    resolve_reserved(source, stem, max_attempts, &HashSet::new())
}

/// Like [`resolve`], but paths in `reserved` count as taken even if nothing exists there
///
/// Dry runs use this to keep planned destinations apart, since no file
/// is actually moved into them.
pub fn resolve_reserved(
    source: &Path,
    stem: &str,
    max_attempts: u32,
    reserved: &HashSet<PathBuf>,
) -> Result<PathBuf> {
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let is_free = |candidate: &Path| {
        candidate == source || (!reserved.contains(candidate) && !candidate.exists())
    };

    let candidate = parent.join(format!("{}{}", stem, ext));
    if is_free(&candidate) {
        return Ok(candidate);
    }

    let mut counter: u32 = 1;
    loop {
        if max_attempts > 0 && counter > max_attempts {
            return Err(SnapnameError::DestinationExhausted {
                stem: stem.to_string(),
                attempts: max_attempts,
            });
        }

        let candidate = parent.join(format!("{}_{}{}", stem, counter, ext));
        trace!("Probing {:?}", candidate);
        if is_free(&candidate) {
            return Ok(candidate);
        }

        counter = counter.checked_add(1).ok_or_else(|| SnapnameError::DestinationExhausted {
            stem: stem.to_string(),
            attempts: u32::MAX,
        })?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_no_collision() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        touch(&source);

        let dest = resolve(&source, "cat", 0).unwrap();
        assert_eq!(dest, dir.path().join("cat.jpg"));
        assert!(!dest.exists());
    }

    #[test]
    fn test_collision_increments_suffix() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        touch(&source);
        touch(&dir.path().join("cat.jpg"));
        touch(&dir.path().join("cat_1.jpg"));

        let dest = resolve(&source, "cat", 0).unwrap();
        assert_eq!(dest, dir.path().join("cat_2.jpg"));
    }

    #[test]
    fn test_source_counts_as_free() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("cat.jpg");
        touch(&source);

        assert_eq!(resolve(&source, "cat", 0).unwrap(), source);
    }

    #[test]
    fn test_suffixed_source_counts_as_free() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("cat.jpg"));
        let source = dir.path().join("cat_1.jpg");
        touch(&source);

        assert_eq!(resolve(&source, "cat", 0).unwrap(), source);
    }

    #[test]
    fn test_keeps_original_extension_case() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("IMG_0001.JPEG");
        touch(&source);

        let dest = resolve(&source, "beach", 0).unwrap();
        assert_eq!(dest, dir.path().join("beach.JPEG"));
    }

    #[test]
    fn test_source_without_extension() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("snapshot");
        touch(&source);
        touch(&dir.path().join("dog"));

        let dest = resolve(&source, "dog", 0).unwrap();
        assert_eq!(dest, dir.path().join("dog_1"));
    }

    #[test]
    fn test_bare_relative_path() {
        let dest = resolve(Path::new("no_such_dir_xyz/photo.png"), "tree", 0).unwrap();
        assert_eq!(dest, PathBuf::from("no_such_dir_xyz/tree.png"));
    }

    #[test]
    fn test_reserved_paths_are_skipped() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        touch(&source);
        touch(&dir.path().join("cat_1.jpg"));

        let reserved: HashSet<PathBuf> = [dir.path().join("cat.jpg")].into_iter().collect();
        let dest = resolve_reserved(&source, "cat", 0, &reserved).unwrap();
        assert_eq!(dest, dir.path().join("cat_2.jpg"));
    }

    #[test]
    fn test_attempt_cap() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        touch(&source);
        touch(&dir.path().join("cat.jpg"));
        touch(&dir.path().join("cat_1.jpg"));
        touch(&dir.path().join("cat_2.jpg"));

        match resolve(&source, "cat", 2) {
            Err(SnapnameError::DestinationExhausted { stem, attempts }) => {
                assert_eq!(stem, "cat");
                assert_eq!(attempts, 2);
            }
            other => panic!("Expected DestinationExhausted, got {:?}", other),
        }

        assert_eq!(resolve(&source, "cat", 3).unwrap(), dir.path().join("cat_3.jpg"));
    }
}
