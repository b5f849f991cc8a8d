//! Copy or compress a dataset into the staging directory.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::files::IMAGE_EXTENSION;

/// Extension added to compressed staging entries.
pub const COMPRESSED_DATASET_EXTENSION: &str = "zip";

/// How a dataset is materialized in the staging directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageMode {
    /// Copy image files into a same-named staging subdirectory.
    Copy,
    /// Write one zip archive of the whole dataset directory.
    Compress,
}

/// Errors from packaging a dataset.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Dataset path {0} has no directory name")]
    InvalidDataset(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to write archive {path}: {source}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Failed to walk dataset {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Package one dataset into `upload_location` using the given mode.
pub fn package_dataset(
    dataset: &Path,
    upload_location: &Path,
    mode: PackageMode,
) -> Result<(), PackageError> {
    match mode {
        PackageMode::Copy => copy_dataset(dataset, upload_location),
        PackageMode::Compress => compress_dataset(dataset, upload_location),
    }
}

/// Copy the dataset, uncompressed, to the upload directory.
///
/// Only image files are copied. A file whose source and destination resolve
/// to the same path is skipped with a log line, not an error, so a dataset
/// already sitting inside the staging tree cannot fail the run.
pub fn copy_dataset(dataset: &Path, upload_location: &Path) -> Result<(), PackageError> {
    let name = dataset_name(dataset)?;
    let destination = upload_location.join(&name);
    info!("Copying {} -> {}", dataset.display(), destination.display());

    fs::create_dir_all(&destination).map_err(|source| io_error(&destination, source))?;

    for image in image_files(dataset)? {
        let Some(file_name) = image.file_name() else {
            continue;
        };
        let target = destination.join(file_name);
        if same_file(&image, &target) {
            info!("Skipped {}, same file.", image.display());
            continue;
        }
        fs::copy(&image, &target).map_err(|source| io_error(&image, source))?;
        info!("Copied {}", file_name.to_string_lossy());
    }

    info!(
        "Dataset: {} copied to upload folder. It will now be uploaded.",
        name
    );
    Ok(())
}

/// Compress the whole dataset directory into
/// `<upload_location>/<name>.zip`, entries prefixed with the dataset name.
///
/// Unlike copy mode the archive carries the full recursive contents, not
/// just image files.
pub fn compress_dataset(dataset: &Path, upload_location: &Path) -> Result<(), PackageError> {
    let name = dataset_name(dataset)?;
    let archive_path =
        upload_location.join(format!("{}.{}", name, COMPRESSED_DATASET_EXTENSION));
    info!(
        "Compressing {} -> {}",
        dataset.display(),
        archive_path.display()
    );

    let file = File::create(&archive_path).map_err(|source| io_error(&archive_path, source))?;
    let mut archive = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let zip_error = |source| PackageError::Zip {
        path: archive_path.clone(),
        source,
    };

    for entry in WalkDir::new(dataset) {
        let entry = entry.map_err(|source| PackageError::Walk {
            path: dataset.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(dataset) else {
            continue;
        };

        let entry_name = if relative.as_os_str().is_empty() {
            name.clone()
        } else {
            format!("{}/{}", name, relative.to_string_lossy())
        };

        if entry.file_type().is_dir() {
            archive.add_directory(entry_name, options).map_err(zip_error)?;
        } else {
            archive.start_file(entry_name, options).map_err(zip_error)?;
            let mut source =
                File::open(entry.path()).map_err(|source| io_error(entry.path(), source))?;
            io::copy(&mut source, &mut archive)
                .map_err(|source| io_error(entry.path(), source))?;
        }
    }

    archive.finish().map_err(zip_error)?;
    info!(
        "{}.{} successfully created! It will now be uploaded.",
        name, COMPRESSED_DATASET_EXTENSION
    );
    Ok(())
}

fn dataset_name(dataset: &Path) -> Result<String, PackageError> {
    dataset
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PackageError::InvalidDataset(dataset.to_path_buf()))
}

fn io_error(path: &Path, source: io::Error) -> PackageError {
    PackageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Image files directly inside the dataset directory, sorted by name.
fn image_files(dataset: &Path) -> Result<Vec<PathBuf>, PackageError> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dataset).map_err(|source| io_error(dataset, source))? {
        let entry = entry.map_err(|source| io_error(dataset, source))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == IMAGE_EXTENSION) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// True when both paths resolve to the identical file on disk.
fn same_file(source: &Path, target: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_dataset(root: &Path, name: &str, images: &[(&str, &[u8])]) -> PathBuf {
        let dataset = root.join(name);
        fs::create_dir_all(&dataset).unwrap();
        for (file_name, contents) in images {
            fs::write(dataset.join(file_name), contents).unwrap();
        }
        dataset
    }

    #[test]
    fn test_copy_stages_every_image_byte_for_byte() {
        let root = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let dataset = make_dataset(
            root.path(),
            "bob",
            &[
                ("bob_1.jpeg", b"first".as_slice()),
                ("bob_2.jpeg", b"second".as_slice()),
                ("bob_3.jpeg", b"third".as_slice()),
            ],
        );

        copy_dataset(&dataset, staging.path()).unwrap();

        let staged = staging.path().join("bob");
        assert_eq!(fs::read_dir(&staged).unwrap().count(), 3);
        assert_eq!(fs::read(staged.join("bob_1.jpeg")).unwrap(), b"first");
        assert_eq!(fs::read(staged.join("bob_2.jpeg")).unwrap(), b"second");
        assert_eq!(fs::read(staged.join("bob_3.jpeg")).unwrap(), b"third");
    }

    #[test]
    fn test_copy_ignores_non_image_files() {
        let root = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let dataset = make_dataset(
            root.path(),
            "bob",
            &[("bob_1.jpeg", b"image".as_slice()), ("notes.txt", b"text".as_slice())],
        );

        copy_dataset(&dataset, staging.path()).unwrap();

        let staged = staging.path().join("bob");
        assert!(staged.join("bob_1.jpeg").exists());
        assert!(!staged.join("notes.txt").exists());
    }

    #[test]
    fn test_copy_is_idempotent() {
        let root = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let dataset = make_dataset(
            root.path(),
            "bob",
            &[("bob_1.jpeg", b"first".as_slice()), ("bob_2.jpeg", b"second".as_slice())],
        );

        copy_dataset(&dataset, staging.path()).unwrap();
        copy_dataset(&dataset, staging.path()).unwrap();

        let staged = staging.path().join("bob");
        assert_eq!(fs::read_dir(&staged).unwrap().count(), 2);
        assert_eq!(fs::read(staged.join("bob_1.jpeg")).unwrap(), b"first");
    }

    #[test]
    fn test_copy_skips_file_that_is_its_own_destination() {
        // Dataset already sits inside the staging root, so every copy
        // would target its own source.
        let staging = tempdir().unwrap();
        let dataset = make_dataset(
            staging.path(),
            "bob",
            &[("bob_1.jpeg", b"first".as_slice())],
        );

        copy_dataset(&dataset, staging.path()).unwrap();

        assert_eq!(fs::read(dataset.join("bob_1.jpeg")).unwrap(), b"first");
        assert_eq!(fs::read_dir(&dataset).unwrap().count(), 1);
    }

    #[test]
    fn test_compress_archives_full_recursive_contents() {
        let root = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let dataset = make_dataset(
            root.path(),
            "bob",
            &[("bob_1.jpeg", b"image".as_slice()), ("notes.txt", b"text".as_slice())],
        );
        fs::create_dir(dataset.join("meta")).unwrap();
        fs::write(dataset.join("meta").join("session.toml"), b"config").unwrap();

        compress_dataset(&dataset, staging.path()).unwrap();

        let archive_path = staging.path().join("bob.zip");
        assert!(archive_path.exists());

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.iter().any(|n| n == "bob/bob_1.jpeg"));
        assert!(names.iter().any(|n| n == "bob/notes.txt"));
        assert!(names.iter().any(|n| n == "bob/meta/session.toml"));

        let mut contents = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name("bob/notes.txt").unwrap(),
            &mut contents,
        )
        .unwrap();
        assert_eq!(contents, "text");
    }

    #[test]
    fn test_compress_produces_exactly_one_archive() {
        let root = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let dataset = make_dataset(root.path(), "bob", &[("bob_1.jpeg", b"image".as_slice())]);

        compress_dataset(&dataset, staging.path()).unwrap();

        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_copy_missing_dataset_errors() {
        let staging = tempdir().unwrap();
        let result = copy_dataset(Path::new("/nonexistent/dataset"), staging.path());
        assert!(result.is_err());
    }
}
