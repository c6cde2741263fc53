// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! snapname: rename images after what they show
//!
//! Pass a single image or a directory; directories are searched recursively.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use snapname::ollama::OllamaDescriber;
use snapname::scan::discover;
use snapname::{AppConfig, BatchReport, BatchRunner, ItemOutcome, Result};

/// snapname CLI - descriptive filenames from a local vision model
#[derive(Parser, Debug)]
#[command(name = "snapname")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Rename images to descriptive filenames using a local vision model", long_about = None)]
struct Cli {
    /// Image file or directory to process
    path: PathBuf,

    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "snapname.json")]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long)]
    quiet: bool,

    /// Output format for the run report
    #[arg(long, default_value = "text", value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Dry run mode (show new names without renaming)
    #[arg(long)]
    dry_run: bool,

    /// Vision model to use (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Ollama URL (overrides config)
    #[arg(long)]
    url: Option<String>,

    /// Skip Ollama health check on startup
    #[arg(long)]
    skip_health_check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if let Err(io) = e.print() {
                eprintln!("{}", io);
                return ExitCode::FAILURE;
            }
            // --help and --version are not failures
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(model) = cli.model {
        config.ai_engine.model = model;
    }
    if let Some(url) = cli.url {
        config.ai_engine.url = url;
    }

    let files = discover(&cli.path, &config.scan.extensions)?;

    if cli.dry_run {
        warn!("DRY RUN MODE - files will not be renamed");
    }

    let describer = OllamaDescriber::from_config(&config.ai_engine)?;

    // An unreachable engine fails each item, not the run
    if !files.is_empty() && !cli.skip_health_check {
        if let Err(e) = check_engine(&describer).await {
            warn!("{}", e);
        }
    }

    let runner = BatchRunner::new(&describer, &config).dry_run(cli.dry_run);
    let report = runner.run_items(files).await;

    print_report(&report, &cli.format)
}

/// Make sure Ollama answers and warn when the model is missing
async fn check_engine(describer: &OllamaDescriber) -> Result<()> {
    let client = describer.client();
    info!("Checking Ollama availability at {}...", client.base_url());
    client.health_check().await?;

    match client.model_available(describer.model()).await {
        Ok(true) => info!("Vision model '{}' available", describer.model()),
        Ok(false) => warn!("Vision model '{}' not found. Try: ollama pull {}", describer.model(), describer.model()),
        Err(e) => warn!("Could not list models: {}", e),
    }

    Ok(())
}

fn print_report(report: &BatchReport, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        "jsonl" => {
            for outcome in &report.outcomes {
                println!("{}", serde_json::to_string(outcome)?);
            }
        }
        _ => {
            for outcome in &report.outcomes {
                if let ItemOutcome::Failed { path, reason, .. } = outcome {
                    eprintln!("Failed: {}: {}", path.display(), reason);
                }
            }
            println!(
                "\nProcessed {} image{}: {} renamed, {} planned, {} already named, {} failed",
                report.total(),
                if report.total() == 1 { "" } else { "s" },
                report.renamed(),
                report.planned(),
                report.already_named(),
                report.failed()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_path() {
        let err = Cli::try_parse_from(["snapname"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["snapname", "/tmp/photos"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("/tmp/photos"));
        assert_eq!(cli.config, PathBuf::from("snapname.json"));
        assert_eq!(cli.format, "text");
        assert!(!cli.dry_run);
        assert!(cli.model.is_none());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "snapname", "/tmp/file.jpg", "--dry-run", "--format", "jsonl", "-m", "llava", "--skip-health-check",
        ]).unwrap();

        assert!(cli.dry_run);
        assert!(cli.skip_health_check);
        assert_eq!(cli.format, "jsonl");
        assert_eq!(cli.model.as_deref(), Some("llava"));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["snapname", "x", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_help_is_not_an_error() {
        let err = Cli::try_parse_from(["snapname", "--help"]).unwrap_err();
        assert!(!err.use_stderr());
    }

    #[tokio::test]
    async fn test_invalid_path_fails_before_engine() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "snapname".to_string(),
            dir.path().join("missing").to_string_lossy().to_string(),
            "--config".to_string(),
            dir.path().join("none.json").to_string_lossy().to_string(),
        ]).unwrap();

        let err = run(cli).await.unwrap_err();
        assert!(matches!(err, snapname::SnapnameError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("photo.jpg");
        std::fs::write(&image, b"pixels").unwrap();

        let cli = Cli::try_parse_from([
            "snapname".to_string(),
            dir.path().to_string_lossy().to_string(),
            "--config".to_string(),
            dir.path().join("none.json").to_string_lossy().to_string(),
            "--url".to_string(),
            "http://127.0.0.1:9".to_string(),
        ]).unwrap();

        assert!(run(cli).await.is_ok());
        assert!(image.exists());
    }

    #[tokio::test]
    async fn test_empty_directory_completes_without_engine() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "snapname".to_string(),
            dir.path().to_string_lossy().to_string(),
            "--config".to_string(),
            dir.path().join("none.json").to_string_lossy().to_string(),
            "--format".to_string(),
            "json".to_string(),
        ]).unwrap();

        assert!(run(cli).await.is_ok());
    }
}
