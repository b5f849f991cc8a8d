//! Camera configuration types and errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Maximum sensor width in pixels.
pub const SENSOR_MAX_WIDTH: u32 = 4056;

/// Maximum sensor height in pixels.
pub const SENSOR_MAX_HEIGHT: u32 = 3040;

/// Maximum supported ISO value. 0 selects automatic gain.
pub const MAX_ISO: u32 = 800;

/// Maximum supported shutter speed.
pub const MAX_SHUTTER_SPEED: u32 = 1_000_000;

/// Maximum white-balance gain for either channel.
pub const MAX_AWB_GAIN: f32 = 8.0;

/// Fixed sensor framerate used for both preview and capture.
pub const DEFAULT_FRAMERATE: u32 = 30;

/// Capture resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Validated camera configuration.
///
/// Values are bounds-checked at the CLI boundary before they reach this
/// layer. Immutable once applied to a device.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub resolution: Resolution,
    /// ISO (film speed). 0 keeps the device's automatic gain.
    pub iso: u32,
    /// How long the shutter stays open per capture.
    pub shutter_speed: u32,
    /// Red white-balance gain. Tuned together with the blue gain so a known
    /// white object renders white.
    pub awb_red_gain: f32,
    /// Blue white-balance gain.
    pub awb_blue_gain: f32,
    pub framerate: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution {
                width: 2000,
                height: 2000,
            },
            iso: 0,
            shutter_speed: 1000,
            awb_red_gain: 3.125,
            awb_blue_gain: 1.96,
            framerate: DEFAULT_FRAMERATE,
        }
    }
}

/// Settings as reported by the device after configuration.
///
/// May differ from the requested values when the device auto-adjusts
/// (ISO 0, for example, leaves gain under automatic control).
#[derive(Debug, Clone)]
pub struct AppliedSettings {
    pub iso: u32,
    pub shutter_speed: u32,
    /// Exposure actually used by the sensor.
    pub exposure_speed: u32,
    pub awb_red_gain: f32,
    pub awb_blue_gain: f32,
}

impl fmt::Display for AppliedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iso: {}, shutter speed: {}, exposure speed: {}, awb gains: ({:.3}, {:.3})",
            self.iso, self.shutter_speed, self.exposure_speed, self.awb_red_gain, self.awb_blue_gain
        )
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("No cameras found")]
    NoDevices,

    #[error("Failed to query cameras: {0}")]
    QueryFailed(String),

    #[error("Camera device {0} not found")]
    DeviceNotFound(u32),

    #[error("Failed to open camera: {0}")]
    OpenFailed(String),

    #[error("Failed to apply {control}: {message}")]
    ControlFailed {
        control: &'static str,
        message: String,
    },

    #[error("Failed to run camera preview: {0}")]
    PreviewFailed(String),

    #[error("Failed to capture image: {0}")]
    CaptureFailed(String),

    #[error("Failed to write image {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_display() {
        let res = Resolution {
            width: 2000,
            height: 2000,
        };
        assert_eq!(format!("{}", res), "2000x2000");
    }

    #[test]
    fn test_camera_config_default() {
        let config = CameraConfig::default();
        assert_eq!(config.resolution.width, 2000);
        assert_eq!(config.resolution.height, 2000);
        assert_eq!(config.iso, 0); // automatic gain
        assert_eq!(config.shutter_speed, 1000);
        assert_eq!(config.framerate, DEFAULT_FRAMERATE);
        assert!((config.awb_red_gain - 3.125).abs() < f32::EPSILON);
        assert!((config.awb_blue_gain - 1.96).abs() < f32::EPSILON);
    }

    #[test]
    fn test_default_config_within_bounds() {
        let config = CameraConfig::default();
        assert!(config.resolution.width <= SENSOR_MAX_WIDTH);
        assert!(config.resolution.height <= SENSOR_MAX_HEIGHT);
        assert!(config.iso <= MAX_ISO);
        assert!(config.shutter_speed <= MAX_SHUTTER_SPEED);
        assert!(config.awb_red_gain <= MAX_AWB_GAIN);
        assert!(config.awb_blue_gain <= MAX_AWB_GAIN);
    }

    #[test]
    fn test_applied_settings_display() {
        let settings = AppliedSettings {
            iso: 100,
            shutter_speed: 1000,
            exposure_speed: 1042,
            awb_red_gain: 3.125,
            awb_blue_gain: 1.96,
        };
        let rendered = format!("{}", settings);
        assert_eq!(
            rendered,
            "iso: 100, shutter speed: 1000, exposure speed: 1042, awb gains: (3.125, 1.960)"
        );
    }

    #[test]
    fn test_camera_error_display() {
        assert_eq!(format!("{}", CameraError::NoDevices), "No cameras found");
        assert_eq!(
            format!("{}", CameraError::DeviceNotFound(0)),
            "Camera device 0 not found"
        );
        let err = CameraError::ControlFailed {
            control: "red balance",
            message: "unsupported".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Failed to apply red balance: unsupported"
        );
    }
}
