// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Discovery of images to rename

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{Result, SnapnameError};

/// Check whether a file name ends with one of `extensions` (case-insensitive)
///
/// Matches on the name suffix, so a bare `.png` counts as a png.
pub fn has_supported_extension(path: &Path, extensions: &[String]) -> bool {
    let name = match path.file_name() {
        Some(n) => n.to_string_lossy().to_lowercase(),
        None => return false,
    };

    extensions.iter().any(|ext| {
        let ext = ext.trim_start_matches('.').to_lowercase();
        !ext.is_empty() && name.ends_with(&format!(".{}", ext))
    })
}

/// Collect the images a run should visit
///
/// A file is returned on its own whatever its extension. A directory is
/// walked recursively and every matching file is returned once, in
/// traversal order. Anything else is an [`SnapnameError::InvalidPath`].
pub fn discover(path: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        return Err(SnapnameError::InvalidPath(path.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        // Links to files count; links to directories are not descended
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());

        if is_file && has_supported_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    debug!("Discovered {} candidate(s) under {:?}", files.len(), path);
    Ok(files)
}
