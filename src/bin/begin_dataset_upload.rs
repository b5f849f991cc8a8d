//! Upload tool entry point.
//!
//! Scans the datasets root, classifies datasets against the staging
//! directory, collects the operator's selection from two checklists, and
//! packages the selection with a worker pool. Exits non-zero when any
//! packaging task failed.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use portrait_kit::cli::UploadArgs;
use portrait_kit::config::Config;
use portrait_kit::prompt::{Prompt, PromptError, TerminalPrompt};
use portrait_kit::upload::{
    default_worker_count, package_datasets, scan_datasets, PackageMode, ScanReport, TaskOutcome,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = UploadArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: UploadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(None)?;
    let datasets_location = config.resolve_datasets_location(args.datasets_location.clone());
    let upload_location = config
        .resolve_upload_location(args.upload_location.clone())
        .ok_or(
            "No upload location configured; pass --upload-location or set \
             paths.upload_location in the config file",
        )?;

    info!("Scanning datasets location: {}", datasets_location.display());
    fs::create_dir_all(&upload_location)?;

    let report = scan_datasets(&datasets_location, &upload_location)?;

    let mut prompt = TerminalPrompt::new();
    let selected = select_datasets(&report, &mut prompt)?;

    if selected.is_empty() {
        info!("No datasets selected. Nothing to do.");
        return Ok(());
    }

    let mode = if args.zip_uploads {
        PackageMode::Compress
    } else {
        PackageMode::Copy
    };
    let workers = args.workers.unwrap_or_else(default_worker_count);

    let outcomes = package_datasets(selected, &upload_location, mode, workers);

    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            error!("Packaging {} failed: {}", outcome.dataset_name(), e);
        }
    }

    let failed: Vec<String> = outcomes
        .iter()
        .filter(|o| o.result.is_err())
        .map(TaskOutcome::dataset_name)
        .collect();

    if failed.is_empty() {
        info!("Staged {} dataset(s) for upload.", outcomes.len());
        Ok(())
    } else {
        Err(format!(
            "{} dataset(s) failed to stage: {}",
            failed.len(),
            failed.join(", ")
        )
        .into())
    }
}

/// Present both checklists and collect the union of the selections.
///
/// The lists are disjoint by construction, so the union cannot contain a
/// dataset twice.
fn select_datasets(
    report: &ScanReport,
    prompt: &mut impl Prompt,
) -> Result<Vec<PathBuf>, PromptError> {
    let unseen_labels: Vec<String> = report.unseen.iter().map(|e| e.label.clone()).collect();
    let chosen = prompt.multi_select(
        "Which un-uploaded datasets would you like to upload?",
        &unseen_labels,
    )?;
    let mut selected: Vec<PathBuf> = chosen
        .into_iter()
        .map(|index| report.unseen[index].path.clone())
        .collect();

    let partial_labels: Vec<String> = report.partial.iter().map(|e| e.label.clone()).collect();
    let chosen = prompt.multi_select(
        "These datasets were partially uploaded. Select the datasets you would like to \
         re-attempt to upload.",
        &partial_labels,
    )?;
    selected.extend(
        chosen
            .into_iter()
            .map(|index| report.partial[index].path.clone()),
    );

    Ok(selected)
}
