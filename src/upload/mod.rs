//! Dataset upload staging: scanning, packaging, and the worker pool.
//!
//! The upload tool inventories dataset directories, classifies them against
//! the staging directory, and packages the operator's selection either as a
//! plain copy or as a zip archive, one worker per dataset.

pub mod package;
pub mod pool;
pub mod scan;

pub use package::{
    compress_dataset, copy_dataset, package_dataset, PackageError, PackageMode,
    COMPRESSED_DATASET_EXTENSION,
};
pub use pool::{default_worker_count, package_datasets, TaskOutcome};
pub use scan::{scan_datasets, DatasetEntry, ScanError, ScanReport};
