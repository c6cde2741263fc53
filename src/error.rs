// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for snapname

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for snapname operations
pub type Result<T> = std::result::Result<T, SnapnameError>;

/// snapname error types
#[derive(Error, Debug)]
pub enum SnapnameError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Ollama not available: {0}")]
    OllamaUnavailable(String),

    #[error("Description failed: {0}")]
    Describe(String),

    #[error("Description timed out after {0:?}")]
    DescribeTimeout(Duration),

    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("No free destination for '{stem}' after {attempts} attempts")]
    DestinationExhausted { stem: String, attempts: u32 },

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Error renaming {} to {}: {}", .from.display(), .to.display(), .source)]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
