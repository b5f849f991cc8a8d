//! Scripted camera device for exercising the preview gate and the capture
//! loop without hardware.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::device::CameraDevice;
use super::types::{AppliedSettings, CameraError};

/// Observable state of a [`FakeCamera`], shared with the test body.
#[derive(Debug, Default)]
pub struct FakeCameraState {
    pub preview_starts: u32,
    pub preview_stops: u32,
    pub captures: Vec<PathBuf>,
}

/// Camera double that writes a stub image file for every capture.
pub struct FakeCamera {
    state: Arc<Mutex<FakeCameraState>>,
    fail_capture: bool,
}

impl FakeCamera {
    /// A working fake plus a handle to inspect what it did.
    pub fn new() -> (Self, Arc<Mutex<FakeCameraState>>) {
        let state = Arc::new(Mutex::new(FakeCameraState::default()));
        (
            Self {
                state: Arc::clone(&state),
                fail_capture: false,
            },
            state,
        )
    }

    /// A fake whose captures always fail.
    pub fn failing() -> Self {
        Self {
            state: Arc::default(),
            fail_capture: true,
        }
    }
}

impl CameraDevice for FakeCamera {
    fn start_preview(&mut self) -> Result<(), CameraError> {
        self.state.lock().unwrap().preview_starts += 1;
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), CameraError> {
        self.state.lock().unwrap().preview_stops += 1;
        Ok(())
    }

    fn capture_still(&mut self, path: &Path) -> Result<(), CameraError> {
        if self.fail_capture {
            return Err(CameraError::CaptureFailed("scripted failure".to_string()));
        }
        fs::write(path, b"stub image data").map_err(|e| CameraError::WriteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.state.lock().unwrap().captures.push(path.to_path_buf());
        Ok(())
    }

    fn applied_settings(&self) -> Result<AppliedSettings, CameraError> {
        Ok(AppliedSettings {
            iso: 0,
            shutter_speed: 1000,
            exposure_speed: 1042,
            awb_red_gain: 3.125,
            awb_blue_gain: 1.96,
        })
    }
}
