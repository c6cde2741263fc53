// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Batch orchestration: describe, normalize, resolve and rename each image
//!
//! Items run one after another in discovery order. Whatever goes wrong with
//! one item is recorded as [`ItemOutcome::Failed`] and the run moves on.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::describe::{prepare_image, Describer};
use crate::normalize::{fit_length, normalize};
use crate::{rename, resolve, scan, AppConfig, Result, SnapnameError};

/// One image in a run, with its 1-based position
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub path: PathBuf,
    pub index: usize,
    pub total: usize,
}

/// Step of the per-item pipeline where a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Read,
    Describe,
    Resolve,
    Rename,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Describe => "describe",
            Stage::Resolve => "resolve",
            Stage::Rename => "rename",
        };
        f.write_str(name)
    }
}

/// Terminal state of one item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Renamed { index: usize, from: PathBuf, to: PathBuf },
    /// Dry run: the rename that would have happened
    Planned { index: usize, from: PathBuf, to: PathBuf },
    AlreadyNamed { index: usize, path: PathBuf },
    Failed { index: usize, path: PathBuf, stage: Stage, reason: String },
}

impl ItemOutcome {
    pub fn index(&self) -> usize {
        match self {
            ItemOutcome::Renamed { index, .. }
            | ItemOutcome::Planned { index, .. }
            | ItemOutcome::AlreadyNamed { index, .. }
            | ItemOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failed { .. })
    }
}

/// Everything that happened during a run, in processing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn renamed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Renamed { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Planned { .. }))
    }

    pub fn already_named(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::AlreadyNamed { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(ItemOutcome::is_failure)
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| pred(o)).count()
    }
}

/// Runs the rename pipeline over a set of images
pub struct BatchRunner<'a> {
    describer: &'a dyn Describer,
    config: &'a AppConfig,
    dry_run: bool,
}

impl<'a> BatchRunner<'a> {
    pub fn new(describer: &'a dyn Describer, config: &'a AppConfig) -> Self {
        Self {
            describer,
            config,
            dry_run: false,
        }
    }

    /// Compute destinations without touching any file
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Discover images under `path` and process them
    ///
    /// Only discovery errors (an invalid path) are returned as `Err`.
    pub async fn run(&self, path: &Path) -> Result<BatchReport> {
        let files = scan::discover(path, &self.config.scan.extensions)?;
        Ok(self.run_items(files).await)
    }

    /// Process already discovered images in order
    pub async fn run_items(&self, files: Vec<PathBuf>) -> BatchReport {
        let total = files.len();
        info!("Found {} image{}.", total, if total == 1 { "" } else { "s" });

        let mut report = BatchReport::default();
        let mut planned = HashSet::new();
        for (i, path) in files.into_iter().enumerate() {
            let item = BatchItem { path, index: i + 1, total };
            let outcome = self.process(&item, &mut planned).await;
            log_outcome(&outcome, total);
            report.outcomes.push(outcome);
        }

        info!(
            "Done: {} renamed, {} already named, {} failed{}",
            report.renamed(),
            report.already_named(),
            report.failed(),
            if self.dry_run { format!(", {} planned", report.planned()) } else { String::new() }
        );

        report
    }

    /// Run the pipeline for one item, never failing past the item boundary
    ///
    /// `planned` holds the destinations a dry run has already handed out in
    /// this run; it stays empty when files are really moved.
    pub async fn process(&self, item: &BatchItem, planned: &mut HashSet<PathBuf>) -> ItemOutcome {
        let fail = |stage: Stage, err: SnapnameError| ItemOutcome::Failed {
            index: item.index,
            path: item.path.clone(),
            stage,
            reason: err.to_string(),
        };

        debug!("{}/{} Describing {:?} with {}", item.index, item.total, item.path, self.describer.name());

        let image = match prepare_image(&item.path, self.config.scan.max_image_dimension) {
            Ok(data) => data,
            Err(e) => return fail(Stage::Read, e),
        };

        let description = match self.describe(&image).await {
            Ok(text) => text,
            Err(e) => return fail(Stage::Describe, e),
        };
        debug!("Description: {:?}", description.trim());

        let stem = fit_length(&normalize(&description), self.config.rules.max_length);

        let attempts = self.config.rules.max_collision_attempts;
        let destination = match resolve::resolve_reserved(&item.path, &stem, attempts, planned) {
            Ok(dest) => dest,
            Err(e) => return fail(Stage::Resolve, e),
        };

        if destination == item.path {
            return ItemOutcome::AlreadyNamed {
                index: item.index,
                path: item.path.clone(),
            };
        }

        if self.dry_run {
            planned.insert(destination.clone());
            return ItemOutcome::Planned {
                index: item.index,
                from: item.path.clone(),
                to: destination,
            };
        }

        match rename::rename(&item.path, &destination) {
            Ok(()) => ItemOutcome::Renamed {
                index: item.index,
                from: item.path.clone(),
                to: destination,
            },
            Err(e) => fail(Stage::Rename, e),
        }
    }

    async fn describe(&self, image: &[u8]) -> Result<String> {
        let call = self.describer.describe(image, &self.config.prompt);

        match self.config.ai_engine.timeout_secs {
            0 => call.await,
            secs => {
                let limit = Duration::from_secs(secs);
                tokio::time::timeout(limit, call)
                    .await
                    .map_err(|_| SnapnameError::DescribeTimeout(limit))?
            }
        }
    }
}

fn log_outcome(outcome: &ItemOutcome, total: usize) {
    match outcome {
        ItemOutcome::Renamed { index, to, .. } => {
            info!("{}/{} Image renamed to: {}", index, total, to.display());
        }
        ItemOutcome::Planned { index, from, to } => {
            info!("{}/{} DRY RUN: would rename {} to {}", index, total, from.display(), to.display());
        }
        ItemOutcome::AlreadyNamed { index, path } => {
            info!("{}/{} Image already has the suggested name: {}", index, total, path.display());
        }
        ItemOutcome::Failed { index, path, stage, reason } => {
            error!("{}/{} Error processing image {} ({}): {}", index, total, path.display(), stage, reason);
        }
    }
}
