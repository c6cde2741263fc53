// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! snapname: descriptive filenames for images
//!
//! A vision model describes each image, the description is normalized into a
//! filesystem-safe stem, and the file is renamed next to where it sits
//! without overwriting anything.

pub mod batch;
pub mod config;
pub mod describe;
pub mod error;
pub mod normalize;
pub mod ollama;
pub mod rename;
pub mod resolve;
pub mod scan;

pub use batch::{BatchReport, BatchRunner, ItemOutcome, Stage};
pub use config::AppConfig;
pub use describe::Describer;
pub use error::{Result, SnapnameError};
