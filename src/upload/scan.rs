//! Dataset inventory and upload classification.
//!
//! Cross-references dataset directories against the staging directory by
//! name and shallow file count. A dataset with no staging counterpart has
//! never been uploaded; one whose counts differ is a re-upload candidate;
//! matching counts mean the dataset is fully staged and it is omitted from
//! both lists.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::package::COMPRESSED_DATASET_EXTENSION;

/// Errors from scanning the dataset and staging trees.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to read archive {path}: {source}")]
    ReadArchive {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}

/// A dataset offered for selection, with a human-readable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub path: PathBuf,
    pub label: String,
}

/// Classified scan results. The two lists are disjoint by construction.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Datasets with no staging counterpart.
    pub unseen: Vec<DatasetEntry>,
    /// Datasets whose staging counterpart has a different file count.
    pub partial: Vec<DatasetEntry>,
}

/// Inventory `datasets_location` and classify every dataset against the
/// staging directory.
///
/// A missing staging directory means nothing has been staged yet: every
/// dataset is unseen.
pub fn scan_datasets(
    datasets_location: &Path,
    upload_location: &Path,
) -> Result<ScanReport, ScanError> {
    let datasets = subdirectories(datasets_location)?;
    let staged = if upload_location.exists() {
        directory_entries(upload_location)?
    } else {
        Vec::new()
    };

    let staged_names: Vec<String> = staged.iter().filter_map(|path| staged_key(path)).collect();

    let mut report = ScanReport::default();

    for dataset in &datasets {
        let Some(name) = base_name(dataset) else {
            continue;
        };
        if !staged_names.iter().any(|staged_name| staged_name == &name) {
            let files = num_files_in_dir(dataset)?;
            report.unseen.push(DatasetEntry {
                path: dataset.clone(),
                label: format!("{}, files: {}", dataset.display(), files),
            });
        }
    }

    let mut seen_keys: Vec<String> = Vec::new();
    for staged_path in &staged {
        let Some(name) = staged_key(staged_path) else {
            continue;
        };
        // A dataset staged both as a directory and an archive is reported once.
        if seen_keys.contains(&name) {
            continue;
        }
        seen_keys.push(name.clone());

        let dataset = datasets_location.join(&name);
        if !dataset.is_dir() {
            continue;
        }
        let dataset_files = num_files_in_dir(&dataset)?;
        let staged_files = staged_entry_count(staged_path)?;
        if dataset_files != staged_files {
            report.partial.push(DatasetEntry {
                path: dataset.clone(),
                label: format!(
                    "dataset: {} - {} files, uploaded: {} - {} files",
                    name,
                    dataset_files,
                    staged_path.display(),
                    staged_files
                ),
            });
        }
    }

    Ok(report)
}

/// Staging-side correlation key: the entry basename with the compression
/// suffix stripped.
fn staged_key(path: &Path) -> Option<String> {
    let name = base_name(path)?;
    let suffix = format!(".{}", COMPRESSED_DATASET_EXTENSION);
    Some(match name.strip_suffix(&suffix) {
        Some(stripped) => stripped.to_string(),
        None => name,
    })
}

fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Subdirectories of `path`, sorted by name for a stable presentation.
fn subdirectories(path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut dirs: Vec<PathBuf> = directory_entries(path)?
        .into_iter()
        .filter(|entry| entry.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn directory_entries(path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let read_error = |source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(read_error)? {
        entries.push(entry.map_err(read_error)?.path());
    }
    entries.sort();
    Ok(entries)
}

/// Shallow entry count: the upload heuristic's only signal.
fn num_files_in_dir(path: &Path) -> Result<usize, ScanError> {
    Ok(directory_entries(path)?.len())
}

/// Number of files inside a staging entry: direct children for a
/// directory, file entries for a zip archive.
fn staged_entry_count(path: &Path) -> Result<usize, ScanError> {
    if path.is_dir() {
        return num_files_in_dir(path);
    }

    let file = File::open(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let archive_error = |source| ScanError::ReadArchive {
        path: path.to_path_buf(),
        source,
    };
    let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;
    let mut files = 0;
    for index in 0..archive.len() {
        if !archive.by_index(index).map_err(archive_error)?.is_dir() {
            files += 1;
        }
    }
    Ok(files)
}
