//! Scoped camera session.
//!
//! Owns exclusive access to the camera for its lifetime and guarantees the
//! preview is stopped on every exit path, including the early return after
//! a rejected preview.

use std::path::Path;

use super::device::CameraDevice;
use super::hardware::HardwareCamera;
use super::types::{AppliedSettings, CameraConfig, CameraError};

/// A configured camera with tracked preview state.
pub struct CameraSession<D: CameraDevice> {
    device: D,
    previewing: bool,
}

impl<D: CameraDevice> CameraSession<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            previewing: false,
        }
    }

    pub fn start_preview(&mut self) -> Result<(), CameraError> {
        self.device.start_preview()?;
        self.previewing = true;
        Ok(())
    }

    pub fn stop_preview(&mut self) -> Result<(), CameraError> {
        self.device.stop_preview()?;
        self.previewing = false;
        Ok(())
    }

    /// Capture a single still image to `path`.
    pub fn capture_still(&mut self, path: &Path) -> Result<(), CameraError> {
        self.device.capture_still(path)
    }

    /// Settings the device is actually using.
    pub fn applied_settings(&self) -> Result<AppliedSettings, CameraError> {
        self.device.applied_settings()
    }

    /// True while the live preview is running.
    pub fn is_previewing(&self) -> bool {
        self.previewing
    }
}

impl<D: CameraDevice> Drop for CameraSession<D> {
    fn drop(&mut self) {
        // The device must not be left streaming.
        if self.previewing {
            let _ = self.device.stop_preview();
        }
    }
}

/// Open the rig camera with the given configuration and wrap it in a scoped
/// session.
///
/// Any failure to apply settings propagates as a fatal startup error.
pub fn configure_camera(config: &CameraConfig) -> Result<CameraSession<HardwareCamera>, CameraError> {
    let device = HardwareCamera::open(config)?;
    Ok(CameraSession::new(device))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::testing::FakeCamera;

    #[test]
    fn test_session_tracks_preview_state() {
        let (device, _state) = FakeCamera::new();
        let mut session = CameraSession::new(device);
        assert!(!session.is_previewing());

        session.start_preview().unwrap();
        assert!(session.is_previewing());

        session.stop_preview().unwrap();
        assert!(!session.is_previewing());
    }

    #[test]
    fn test_session_drop_stops_live_preview() {
        let (device, state) = FakeCamera::new();
        {
            let mut session = CameraSession::new(device);
            session.start_preview().unwrap();
        }
        assert_eq!(state.lock().unwrap().preview_stops, 1);
    }

    #[test]
    fn test_session_drop_skips_stopped_preview() {
        let (device, state) = FakeCamera::new();
        {
            let mut session = CameraSession::new(device);
            session.start_preview().unwrap();
            session.stop_preview().unwrap();
        }
        // Stopped once by the caller, not a second time on drop.
        assert_eq!(state.lock().unwrap().preview_stops, 1);
    }
}
