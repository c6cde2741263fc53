// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filesystem rename

use std::path::Path;
use tracing::debug;

use crate::{Result, SnapnameError};

/// Move `source` to `destination` without clobbering an existing file
///
/// The source is left untouched on failure.
pub fn rename(source: &Path, destination: &Path) -> Result<()> {
    // Narrows the window left open by resolve; it cannot close it
    if destination.exists() {
        return Err(SnapnameError::DestinationExists(destination.to_path_buf()));
    }

    std::fs::rename(source, destination).map_err(|e| SnapnameError::Rename {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: e,
    })?;

    debug!("Renamed {:?} -> {:?}", source, destination);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_rename_moves_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        let dest = dir.path().join("cat.jpg");
        fs::write(&source, b"pixels").unwrap();

        rename(&source, &dest).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
    }

    #[test]
    fn test_refuses_existing_destination() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("photo.jpg");
        let dest = dir.path().join("cat.jpg");
        fs::write(&source, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();

        let err = rename(&source, &dest).unwrap_err();
        assert!(matches!(err, SnapnameError::DestinationExists(ref p) if p == &dest));
        assert_eq!(fs::read(&source).unwrap(), b"new");
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn test_missing_source_reports_both_paths() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("gone.jpg");
        let dest = dir.path().join("cat.jpg");

        let err = rename(&source, &dest).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, SnapnameError::Rename { .. }));
        assert!(message.contains("gone.jpg"));
        assert!(message.contains("cat.jpg"));
    }
}
