//! Preview gate: show the configured camera output and let the operator
//! approve or reject it before a capture run commits.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::info;
use thiserror::Error;

use crate::prompt::{Prompt, PromptError};

use super::device::CameraDevice;
use super::session::CameraSession;
use super::types::CameraError;

const APPROVE_MESSAGE: &str = "Did the settings look good?";

/// Errors from the preview gate.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// The throwaway preview capture could not be removed. The file must
    /// never leak into the dataset, so this is surfaced instead of ignored.
    #[error("Failed to delete preview capture {path}: {source}")]
    Cleanup { path: PathBuf, source: io::Error },
}

/// Show a live preview for `preview_time`, capture one throwaway still to
/// `preview_capture_path`, and report the settings the device settled on.
///
/// When `prompt_on_timeout` is true the operator is asked whether the
/// settings looked good; otherwise the configuration is approved
/// automatically. The throwaway capture is deleted on every path, approved
/// or not. The caller must not start a capture run when this returns
/// `false`.
pub fn verify_camera_config<D: CameraDevice, P: Prompt>(
    session: &mut CameraSession<D>,
    preview_time: Duration,
    prompt_on_timeout: bool,
    preview_capture_path: &Path,
    prompt: &mut P,
) -> Result<bool, PreviewError> {
    session.start_preview()?;

    // Automatically calculated settings need the preview window to settle
    // before the read-back below means anything.
    thread::sleep(preview_time);

    info!(
        "Capturing preview image {}",
        preview_capture_path.display()
    );
    session.capture_still(preview_capture_path)?;
    info!("Preview image available.");

    let decision = settle_and_ask(session, prompt_on_timeout, prompt);

    // The preview file is removed before either result is reported, so it
    // cannot end up in the dataset even when the prompt fails.
    let cleanup = fs::remove_file(preview_capture_path).map_err(|source| PreviewError::Cleanup {
        path: preview_capture_path.to_path_buf(),
        source,
    });

    let approved = decision?;
    cleanup?;
    Ok(approved)
}

fn settle_and_ask<D: CameraDevice, P: Prompt>(
    session: &mut CameraSession<D>,
    prompt_on_timeout: bool,
    prompt: &mut P,
) -> Result<bool, PreviewError> {
    session.stop_preview()?;

    let settings = session.applied_settings()?;
    info!("Camera settings - {}", settings);

    if prompt_on_timeout {
        Ok(prompt.confirm(APPROVE_MESSAGE)?)
    } else {
        Ok(true)
    }
}
