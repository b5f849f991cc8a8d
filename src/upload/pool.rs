//! Fixed-size worker pool for packaging tasks.
//!
//! One task per dataset: workers drain a shared queue and report one
//! outcome per task over a channel. A failure is confined to its own task
//! and never stops the other workers.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use log::info;

use super::package::{package_dataset, PackageError, PackageMode};

/// Result of packaging a single dataset.
#[derive(Debug)]
pub struct TaskOutcome {
    pub dataset: PathBuf,
    pub result: Result<(), PackageError>,
}

impl TaskOutcome {
    /// Basename of the dataset, for summary reporting.
    pub fn dataset_name(&self) -> String {
        self.dataset
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dataset.display().to_string())
    }
}

/// Number of workers to use when none is configured.
pub fn default_worker_count() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Package every dataset into `upload_location`, blocking until all tasks
/// finish.
///
/// Each dataset is processed by exactly one worker; completion order
/// between datasets is not guaranteed. Outcomes are returned sorted by
/// dataset path so reporting is deterministic.
pub fn package_datasets(
    datasets: Vec<PathBuf>,
    upload_location: &Path,
    mode: PackageMode,
    workers: usize,
) -> Vec<TaskOutcome> {
    if datasets.is_empty() {
        return Vec::new();
    }

    let task_count = datasets.len();
    let workers = workers.clamp(1, task_count);
    info!(
        "Packaging {} dataset(s) with {} worker(s).",
        task_count, workers
    );

    let queue = Arc::new(Mutex::new(datasets.into_iter().collect::<VecDeque<_>>()));
    let (outcome_tx, outcome_rx) = mpsc::channel();

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let queue = Arc::clone(&queue);
        let outcome_tx = outcome_tx.clone();
        let upload_location = upload_location.to_path_buf();
        handles.push(thread::spawn(move || loop {
            let dataset = {
                let mut queue = match queue.lock() {
                    Ok(queue) => queue,
                    // Another worker panicked while holding the lock;
                    // leave the remaining tasks to it.
                    Err(_) => break,
                };
                queue.pop_front()
            };
            let Some(dataset) = dataset else {
                break;
            };
            let result = package_dataset(&dataset, &upload_location, mode);
            if outcome_tx.send(TaskOutcome { dataset, result }).is_err() {
                break;
            }
        }));
    }

    // Receiving ends once every worker's sender clone is dropped.
    drop(outcome_tx);
    let mut outcomes: Vec<TaskOutcome> = outcome_rx.iter().collect();

    for handle in handles {
        let _ = handle.join();
    }

    outcomes.sort_by(|a, b| a.dataset.cmp(&b.dataset));
    outcomes
}
