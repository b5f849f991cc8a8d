//! Sequential image capture into a dataset directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use log::{info, warn};
use thiserror::Error;

use crate::camera::{CameraDevice, CameraError, CameraSession};
use crate::files::image_filename;

/// Wait between the preview gate closing and the first capture so
/// automatically calculated settings hold steady.
pub const PREVIEW_CAPTURE_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Errors from a capture run.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("Failed to create dataset directory {path}: {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },
}

/// Summary of a finished capture run.
#[derive(Debug)]
pub struct CaptureReport {
    /// Number of images written.
    pub captured: u32,
    /// True when the run was stopped early by the operator.
    pub interrupted: bool,
}

/// Global flag set by the Ctrl+C handler.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the Ctrl+C handler. Call once at program startup.
pub fn setup_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        INTERRUPTED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, stopping after the current capture...");
    })
}

fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Resolve the dataset directory under `datasets_location`, creating it
/// when absent.
///
/// Re-running with an existing dataset name appends to that dataset, which
/// is worth a warning but not an error.
pub fn prepare_images_directory(
    datasets_location: &Path,
    dataset_name: &str,
) -> Result<PathBuf, CaptureError> {
    let images_directory = datasets_location.join(dataset_name);

    if images_directory.exists() {
        warn!(
            "Directory {} already exists, you'll be adding to an existing dataset rather than creating a new one.",
            images_directory.display()
        );
    } else {
        fs::create_dir_all(&images_directory).map_err(|source| CaptureError::CreateDirectory {
            path: images_directory.clone(),
            source,
        })?;
    }

    Ok(images_directory)
}

/// Pick a filename for the next capture.
///
/// Re-probes with a fresh timestamp until the name is free, so a burst
/// faster than the timestamp resolution cannot overwrite an earlier image.
fn next_image_path(images_directory: &Path, dataset_name: &str) -> PathBuf {
    loop {
        let candidate = images_directory.join(image_filename(dataset_name, Local::now()));
        if !candidate.exists() {
            return candidate;
        }
    }
}

/// Capture `count` images in sequence into `images_directory`.
///
/// The preview runs for the whole capture phase. A failed capture aborts
/// the run; images already taken stay in the dataset.
pub fn capture_dataset<D: CameraDevice>(
    session: &mut CameraSession<D>,
    images_directory: &Path,
    dataset_name: &str,
    count: u32,
    grace_period: Duration,
) -> Result<CaptureReport, CaptureError> {
    session.start_preview()?;

    info!(
        "Waiting {} seconds before capturing photos...",
        grace_period.as_secs()
    );
    thread::sleep(grace_period);

    info!("Starting to capture images...");
    let capture_start = Instant::now();
    let mut captured = 0u32;
    let mut was_interrupted = false;

    for index in 0..count {
        if interrupted() {
            warn!("Capture interrupted after {} of {} images.", captured, count);
            was_interrupted = true;
            break;
        }

        let image_path = next_image_path(images_directory, dataset_name);
        info!(
            "Capturing image {}/{} - {}",
            index + 1,
            count,
            image_path.display()
        );
        session.capture_still(&image_path)?;
        captured += 1;
    }

    let elapsed = capture_start.elapsed();
    session.stop_preview()?;

    if captured > 0 {
        info!(
            "Captured {} images in {:.1}s. Capture rate: {:.2} photos per second. Bye.",
            captured,
            elapsed.as_secs_f64(),
            f64::from(captured) / elapsed.as_secs_f64()
        );
    }

    Ok(CaptureReport {
        captured,
        interrupted: was_interrupted,
    })
}
